//! 3x3 kernel convolution and Sobel edge detection.
//!
//! A kernel is nine signed weights in row-major order, centered on the pixel
//! being computed. Neighbors that fall off the image are skipped entirely
//! rather than being replaced by some border value, and the number of
//! neighbors that actually contributed is tracked so that averaging kernels can
//! divide by it.
//!
//! Every pass reads from a snapshot taken before the pass starts, so no pixel
//! ever sees a value written by the same pass.

use crate::{
  pixel::{clamp_truncate, Pixel, PixelAccumulator},
  Image, ImagoResult, RangeError,
};

/// If a channel's Sobel magnitude differs from the original by at least this
/// much, the magnitude replaces it.
pub const EDGE_THRESHOLD: u8 = 100;

/// Nine weights in row-major order around the center pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Kernel3x3(pub [i8; 9]);
impl Kernel3x3 {
  /// Box blur, meant to be used with [`Normalization::Mean`].
  pub const BLUR: Self = Self([1, 1, 1, 1, 1, 1, 1, 1, 1]);
  pub const RIDGE: Self = Self([0, -1, 0, -1, 4, -1, 0, -1, 0]);
  pub const SHARPEN: Self = Self([0, -1, 0, -1, 5, -1, 0, -1, 0]);
  pub const EMBOSS: Self = Self([-2, -1, 0, -1, 1, 1, 0, 1, 2]);
  /// Horizontal gradient.
  pub const SOBEL_X: Self = Self([-1, 0, 1, -2, 0, 2, -1, 0, 1]);
  /// Vertical gradient, the transpose of `SOBEL_X`.
  pub const SOBEL_Y: Self = Self([-1, -2, -1, 0, 0, 0, 1, 2, 1]);

  /// Sums `weight * neighbor` over the in-bounds neighbors of `(row, col)`.
  ///
  /// Returns the sum along with how many neighbors were in bounds.
  #[must_use]
  pub fn accumulate(&self, image: &Image, row: usize, col: usize) -> (PixelAccumulator, usize) {
    let mut acc = PixelAccumulator::default();
    let mut counter = 0;
    let mut weights = self.0.iter().copied();
    for d_row in [-1_isize, 0, 1] {
      for d_col in [-1_isize, 0, 1] {
        // the iterator always has exactly nine weights.
        let weight = weights.next().unwrap_or(0);
        let (Some(r), Some(c)) =
          (row.checked_add_signed(d_row), col.checked_add_signed(d_col))
        else {
          continue;
        };
        if let Ok(p) = image.get(r, c) {
          counter += 1;
          acc.add_weighted(p, f64::from(weight));
        }
      }
    }
    (acc, counter)
  }
}

/// What to do with a kernel sum before it's written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Normalization {
  /// Use the raw sum.
  #[default]
  None,
  /// Divide by the number of in-bounds neighbors.
  Mean,
}

impl Image {
  /// Runs `kernel` over every pixel.
  ///
  /// ## Failure
  /// * A [`Normalization::Mean`] pixel had no in-bounds neighbors. The center
  ///   pixel always counts, so this doesn't happen with real images.
  pub fn apply_kernel_3x3(&mut self, kernel: Kernel3x3, norm: Normalization) -> ImagoResult<()> {
    let snapshot = self.clone();
    let width = self.width();
    for (i, out) in self.pixels_mut().iter_mut().enumerate() {
      let (row, col) = (i / width, i % width);
      let (acc, counter) = kernel.accumulate(&snapshot, row, col);
      *out = match norm {
        Normalization::None => acc.to_pixel(),
        Normalization::Mean if counter == 0 => return Err(RangeError::NoValidNeighbors.into()),
        Normalization::Mean => acc.div(counter as f64).to_pixel(),
      };
    }
    Ok(())
  }

  /// Mean filter over each 3x3 neighborhood, edge aware.
  pub fn blur(&mut self) -> ImagoResult<()> {
    self.apply_kernel_3x3(Kernel3x3::BLUR, Normalization::Mean)
  }

  pub fn ridge(&mut self) -> ImagoResult<()> {
    self.apply_kernel_3x3(Kernel3x3::RIDGE, Normalization::None)
  }

  pub fn sharpen(&mut self) -> ImagoResult<()> {
    self.apply_kernel_3x3(Kernel3x3::SHARPEN, Normalization::None)
  }

  pub fn emboss(&mut self) -> ImagoResult<()> {
    self.apply_kernel_3x3(Kernel3x3::EMBOSS, Normalization::None)
  }

  /// Overlays Sobel edges onto the image.
  ///
  /// Per channel, the gradient magnitude `sqrt(gx² + gy²)` (clamped to 255)
  /// replaces the original value only when the two differ by at least
  /// [`EDGE_THRESHOLD`]. Everything else is left alone, so this is *not* a pure
  /// edge map.
  pub fn edges(&mut self) {
    let snapshot = self.clone();
    let width = self.width();
    for (i, out) in self.pixels_mut().iter_mut().enumerate() {
      let (row, col) = (i / width, i % width);
      let (gx, _) = Kernel3x3::SOBEL_X.accumulate(&snapshot, row, col);
      let (gy, _) = Kernel3x3::SOBEL_Y.accumulate(&snapshot, row, col);
      let magnitude = Pixel::new(
        clamp_truncate(gx.red.hypot(gy.red)),
        clamp_truncate(gx.green.hypot(gy.green)),
        clamp_truncate(gx.blue.hypot(gy.blue)),
      );
      out.red = edge_select(out.red, magnitude.red);
      out.green = edge_select(out.green, magnitude.green);
      out.blue = edge_select(out.blue, magnitude.blue);
    }
  }
}

#[inline]
#[must_use]
const fn edge_select(original: u8, magnitude: u8) -> u8 {
  if original.abs_diff(magnitude) >= EDGE_THRESHOLD {
    magnitude
  } else {
    original
  }
}
