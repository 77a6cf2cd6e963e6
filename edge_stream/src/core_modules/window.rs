// THEORY:
// The `SlidingWindow` is the 3x3 neighbourhood the Sobel operator looks at. It is a
// fixed array, not a view into an image: every step shifts the columns left, drops
// the oldest column and appends a freshly assembled one, so after the step the
// window covers the three most recent rows at the three most recent columns.
//
// The gradient sums are written out term by term. Zero-weight taps are skipped
// outright, which leaves six multiply-adds per axis and no loop to bound-check.

pub const KERNEL_SIZE: usize = 3;

/// Horizontal Sobel kernel, row-major, top row first.
pub const SOBEL_X: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
/// Vertical Sobel kernel, row-major, top row first.
pub const SOBEL_Y: [[i32; KERNEL_SIZE]; KERNEL_SIZE] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// Right shift applied to `|Gx| + |Gy|` before saturation.
pub const MAGNITUDE_SHIFT: u32 = 1;

/// A 3x3 neighbourhood of luma samples. `cells[row][col]`, row 0 is the oldest row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlidingWindow {
    cells: [[u8; KERNEL_SIZE]; KERNEL_SIZE],
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [[u8; KERNEL_SIZE]; KERNEL_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[[u8; KERNEL_SIZE]; KERNEL_SIZE] {
        &self.cells
    }

    /// Drops column 0, shifts the rest left and writes `column` (top to bottom) as
    /// the new rightmost column.
    #[inline]
    pub fn shift_in(&mut self, column: [u8; KERNEL_SIZE]) {
        for (row, incoming) in self.cells.iter_mut().zip(column) {
            row.copy_within(1.., 0);
            row[KERNEL_SIZE - 1] = incoming;
        }
    }

    /// Returns `(Gx, Gy)` for the current neighbourhood.
    #[inline]
    pub fn gradients(&self) -> (i32, i32) {
        let [[p00, p01, p02], [p10, _, p12], [p20, p21, p22]] = self.cells;
        let (p00, p01, p02) = (p00 as i32, p01 as i32, p02 as i32);
        let (p10, p12) = (p10 as i32, p12 as i32);
        let (p20, p21, p22) = (p20 as i32, p21 as i32, p22 as i32);

        let gx = -p00 + p02 - 2 * p10 + 2 * p12 - p20 + p22;
        let gy = p00 + 2 * p01 + p02 - p20 - 2 * p21 - p22;
        (gx, gy)
    }

    /// Halved L1 gradient magnitude, saturated to a byte.
    #[inline]
    pub fn magnitude(&self) -> u8 {
        let (gx, gy) = self.gradients();
        let scaled = (gx.abs() + gy.abs()) >> MAGNITUDE_SHIFT;
        scaled.clamp(0, u8::MAX as i32) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel_sum(cells: &[[u8; 3]; 3], kernel: &[[i32; 3]; 3]) -> i32 {
        let mut acc = 0;
        for kr in 0..KERNEL_SIZE {
            for kc in 0..KERNEL_SIZE {
                acc += cells[kr][kc] as i32 * kernel[kr][kc];
            }
        }
        acc
    }

    #[test]
    fn unrolled_sums_match_kernels() {
        let cells = [[3, 17, 250], [99, 0, 42], [128, 64, 7]];
        let window = SlidingWindow::from_cells(cells);
        assert_eq!(window.gradients(), (kernel_sum(&cells, &SOBEL_X), kernel_sum(&cells, &SOBEL_Y)));
    }

    #[test]
    fn shift_in_appends_on_the_right() {
        let mut window = SlidingWindow::new();
        window.shift_in([1, 2, 3]);
        window.shift_in([4, 5, 6]);
        window.shift_in([7, 8, 9]);
        assert_eq!(window.cells(), &[[1, 4, 7], [2, 5, 8], [3, 6, 9]]);
        window.shift_in([10, 11, 12]);
        assert_eq!(window.cells(), &[[4, 7, 10], [5, 8, 11], [6, 9, 12]]);
    }

    #[test]
    fn flat_patch_has_no_gradient() {
        let window = SlidingWindow::from_cells([[200; 3]; 3]);
        assert_eq!(window.gradients(), (0, 0));
        assert_eq!(window.magnitude(), 0);
    }

    #[test]
    fn magnitude_is_halved_and_saturated() {
        // Left column dark, right column bright: Gx = 4 * 10, Gy = 0.
        let window = SlidingWindow::from_cells([[0, 0, 10], [0, 0, 10], [0, 0, 10]]);
        assert_eq!(window.gradients(), (40, 0));
        assert_eq!(window.magnitude(), 20);

        // Bright corners: |Gx| + |Gy| = 1530, halved to 765, clamped.
        let window = SlidingWindow::from_cells([[255, 255, 255], [255, 0, 0], [255, 0, 0]]);
        assert_eq!(window.magnitude(), 255);
        let window = SlidingWindow::from_cells([[0, 0, 0], [0, 0, 255], [0, 255, 255]]);
        assert_eq!(window.magnitude(), 255);
    }
}
