// THEORY:
// The `SobelConvolver` is the heart of the edge engine. It is a stateful stage that
// consumes luma samples in raster order, one at a time, and emits an edge magnitude
// whenever the samples seen so far complete a 3x3 neighbourhood around an interior
// pixel.
//
// Key architectural principles:
// 1.  **Bounded Memory**: The only state is one `LineBuffer` (two rows) and one
//     `SlidingWindow` (nine samples). The frame itself is never held.
// 2.  **Lockstep Streaming**: Every input sample performs exactly one window shift
//     and one line-buffer rotation. Output is a pure function of the sample order.
// 3.  **Aligned Window**: The sample at stream position `(row, col)` completes the
//     window centred on `(row - 1, col - 1)`. A magnitude is emitted only when that
//     centre is an interior pixel, i.e. once `row >= 2` and `col >= 2`. Border
//     pixels feed the window but never produce output, which is where the fixed
//     `(height - 2) x (width - 2)` output size comes from.
// 4.  **Exclusive Ownership**: A convolver is built per frame. Concurrent frames get
//     their own instance, so no line buffer is ever shared between runs.

use crate::core_modules::geometry::FrameGeometry;
use crate::core_modules::line_buffer::LineBuffer;
use crate::core_modules::window::{KERNEL_SIZE, SlidingWindow};
use crate::error::EdgeError;

/// Streams luma samples through a line buffer and 3x3 window.
#[derive(Debug, Clone)]
pub struct SobelConvolver {
    geometry: FrameGeometry,
    line_buffer: LineBuffer,
    window: SlidingWindow,
    /// Stream row of the next sample.
    row: usize,
    /// Stream column of the next sample.
    col: usize,
    /// Magnitudes emitted so far.
    emitted: usize,
}

impl SobelConvolver {
    pub fn new(geometry: FrameGeometry) -> Result<Self, EdgeError> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            line_buffer: LineBuffer::new(geometry.width)?,
            window: SlidingWindow::new(),
            row: 0,
            col: 0,
            emitted: 0,
        })
    }

    /// Feeds one luma sample. Returns the magnitude for the pixel whose neighbourhood
    /// this sample completes, if that pixel is interior.
    ///
    /// Samples beyond `height * width` are ignored.
    pub fn push(&mut self, luma: u8) -> Option<u8> {
        if self.is_finished() {
            return None;
        }
        let (row, col) = (self.row, self.col);

        let [oldest, newest] = self.line_buffer.rotate(row, col, luma)?;
        self.window.shift_in([oldest, newest, luma]);

        self.col += 1;
        if self.col == self.geometry.width {
            self.col = 0;
            self.row += 1;
        }

        if row >= KERNEL_SIZE - 1 && col >= KERNEL_SIZE - 1 {
            self.emitted += 1;
            Some(self.window.magnitude())
        } else {
            None
        }
    }

    /// True once `height * width` samples have been consumed.
    pub fn is_finished(&self) -> bool {
        self.row >= self.geometry.height
    }

    pub fn consumed(&self) -> usize {
        self.row * self.geometry.width + self.col
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Clears the line buffer and window and rewinds to the start of a frame.
    pub fn reset(&mut self) {
        self.line_buffer.clear();
        self.window = SlidingWindow::new();
        self.row = 0;
        self.col = 0;
        self.emitted = 0;
    }
}
