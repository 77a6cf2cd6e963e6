// THEORY:
// The `LineBuffer` is what lets a one-dimensional pixel stream behave like a
// two-dimensional image. It retains the last `KERNEL_SIZE - 1` rows of luma, one
// sample per column, and nothing more.
//
// Rows are never copied. The buffer is a fixed set of row slots addressed by the
// stream row number modulo the slot count: while the stream is on image row `r`,
// slot `(r + k) % ROWS` holds image row `r - ROWS + k` (k = 0 is the oldest). When
// a new sample arrives at column `c`, the oldest row's cell at `c` is read out and
// then overwritten with the new sample, which makes it the newest row for the next
// pass without moving any other data.

use crate::core_modules::window::KERNEL_SIZE;
use crate::error::EdgeError;

/// Maximum frame width the line buffer will accept.
pub const MAX_WIDTH: usize = 4096;
/// Number of retained rows.
pub const LINE_BUFFER_ROWS: usize = KERNEL_SIZE - 1;

/// The `KERNEL_SIZE - 1` most recent rows of luma samples.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    rows: [Vec<u8>; LINE_BUFFER_ROWS],
    width: usize,
}

impl LineBuffer {
    /// Allocates a zeroed buffer for rows of `width` samples.
    pub fn new(width: usize) -> Result<Self, EdgeError> {
        if width == 0 {
            return Err(EdgeError::ZeroDimension { height: LINE_BUFFER_ROWS, width });
        }
        if width > MAX_WIDTH {
            return Err(EdgeError::WidthTooLarge { width, max: MAX_WIDTH });
        }
        Ok(Self {
            rows: std::array::from_fn(|_| vec![0u8; width]),
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Reads column `col` of every retained row, oldest first, then stores `incoming`
    /// in place of the oldest one.
    ///
    /// Returns `None` without touching the buffer if `col` is outside the row width.
    pub fn rotate(&mut self, row: usize, col: usize, incoming: u8) -> Option<[u8; LINE_BUFFER_ROWS]> {
        if col >= self.width {
            return None;
        }
        let column = std::array::from_fn(|k| self.rows[(row + k) % LINE_BUFFER_ROWS][col]);
        self.rows[row % LINE_BUFFER_ROWS][col] = incoming;
        Some(column)
    }

    /// Zeroes every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }
}
