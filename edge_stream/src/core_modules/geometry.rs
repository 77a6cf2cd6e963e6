// THEORY:
// `FrameGeometry` is the dimension bookkeeping shared by every stage. The stages
// themselves only count samples; this type is where `(height, width)` turns into
// input/output pixel counts and transport word counts, and where the caller's
// buffers are checked against the contract before any data moves.
//
// A 3x3 operator loses one pixel on every side, so the output frame is always
// `(height - 2) x (width - 2)`. Frames narrower or shorter than three pixels are
// degenerate: they are valid input and produce an empty output.

use crate::core_modules::line_buffer::MAX_WIDTH;
use crate::core_modules::transport::words_for;
use crate::core_modules::window::KERNEL_SIZE;
use crate::error::EdgeError;

const BORDER: usize = KERNEL_SIZE - 1;

/// The dimensions of one frame and everything derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    pub height: usize,
    pub width: usize,
}

impl FrameGeometry {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Checks the dimensions alone: non-zero, within `MAX_WIDTH`, addressable.
    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.height == 0 || self.width == 0 {
            return Err(EdgeError::ZeroDimension { height: self.height, width: self.width });
        }
        if self.width > MAX_WIDTH {
            return Err(EdgeError::WidthTooLarge { width: self.width, max: MAX_WIDTH });
        }
        if self.height.checked_mul(self.width).is_none() {
            return Err(EdgeError::DimensionOverflow { height: self.height, width: self.width });
        }
        Ok(())
    }

    /// Checks the dimensions and that both buffers are large enough.
    pub fn validate_buffers(&self, input_words: usize, output_words: usize) -> Result<(), EdgeError> {
        self.validate()?;
        let expected = self.input_words();
        if input_words < expected {
            return Err(EdgeError::InputTooShort { expected, actual: input_words });
        }
        let expected = self.output_words();
        if output_words < expected {
            return Err(EdgeError::OutputTooShort { expected, actual: output_words });
        }
        Ok(())
    }

    /// True when the frame is too small to contain any interior pixel.
    pub fn is_degenerate(&self) -> bool {
        self.height < KERNEL_SIZE || self.width < KERNEL_SIZE
    }

    pub fn input_pixels(&self) -> usize {
        self.height * self.width
    }

    pub fn input_words(&self) -> usize {
        words_for(self.input_pixels())
    }

    pub fn output_height(&self) -> usize {
        if self.is_degenerate() { 0 } else { self.height - BORDER }
    }

    pub fn output_width(&self) -> usize {
        if self.is_degenerate() { 0 } else { self.width - BORDER }
    }

    pub fn output_pixels(&self) -> usize {
        self.output_height() * self.output_width()
    }

    pub fn output_words(&self) -> usize {
        words_for(self.output_pixels())
    }
}
