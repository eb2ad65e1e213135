//! Gaussian blur with edge replicated borders.

use core::f64::consts::PI;

use crate::{pixel::PixelAccumulator, Image, ImagoResult, RangeError};

/// The kernel reaches this many standard deviations out from the center.
pub const GAUSS_SUPPORT_SIGMAS: f64 = 3.0;

/// A square `(2r+1)x(2r+1)` Gaussian kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussKernel {
  radius: usize,
  weights: Vec<f64>,
}
impl GaussKernel {
  /// Distance from the center weight to the kernel's edge.
  #[inline]
  #[must_use]
  pub const fn radius(&self) -> usize {
    self.radius
  }

  /// Width (and height) of the kernel.
  #[inline]
  #[must_use]
  pub const fn size(&self) -> usize {
    2 * self.radius + 1
  }

  /// Weights in row-major order.
  #[inline]
  #[must_use]
  pub fn weights(&self) -> &[f64] {
    &self.weights
  }

  /// The weight at offset `(dy, dx)` from the center.
  #[inline]
  #[must_use]
  pub fn weight(&self, dy: isize, dx: isize) -> Option<f64> {
    let r = self.radius as isize;
    if dy.abs() > r || dx.abs() > r {
      return None;
    }
    let i = (dy + r) as usize * self.size() + (dx + r) as usize;
    self.weights.get(i).copied()
  }
}

/// The 2D Gaussian density at `(x, y)`.
#[inline]
#[must_use]
pub fn gauss_2d(x: f64, y: f64, sigma: f64) -> f64 {
  let two_sigma_sq = 2.0 * sigma * sigma;
  (-(x * x + y * y) / two_sigma_sq).exp() / (PI * two_sigma_sq)
}

/// The kernel radius used for a given `sigma`: `round(3σ)`.
pub fn gauss_radius(sigma: f64) -> ImagoResult<usize> {
  if !(sigma.is_finite() && sigma > 0.0) {
    return Err(RangeError::Sigma(sigma).into());
  }
  let r = (GAUSS_SUPPORT_SIGMAS * sigma).round();
  // a radius this big would never fit in memory anyway
  if r > (u32::MAX as f64) {
    return Err(RangeError::Sigma(sigma).into());
  }
  Ok(r as usize)
}

/// Builds the kernel for `sigma`.
///
/// Each weight is `G(x, y, σ)` for integer offsets in `-r..=r`, used as is.
/// The weights are not rescaled, so they sum to a bit less than 1 and a tiny
/// `sigma` gives a single center weight well above 1.
///
/// ## Failure
/// * `sigma` isn't finite and positive.
/// * The kernel would be too big to allocate.
pub fn make_gauss_kernel(sigma: f64) -> ImagoResult<GaussKernel> {
  let radius = gauss_radius(sigma)?;
  let count = radius
    .checked_mul(2)
    .and_then(|d| d.checked_add(1))
    .and_then(|size| size.checked_mul(size))
    .ok_or(RangeError::Sigma(sigma))?;
  let mut weights: Vec<f64> = Vec::new();
  weights.try_reserve_exact(count).map_err(|_| RangeError::Sigma(sigma))?;
  let r = radius as isize;
  for y in -r..=r {
    for x in -r..=r {
      weights.push(gauss_2d(x as f64, y as f64, sigma));
    }
  }
  log::trace!(
    "gauss kernel: sigma {sigma}, radius {radius}, mass {}",
    weights.iter().sum::<f64>()
  );
  Ok(GaussKernel { radius, weights })
}

/// Makes a copy of `image` with `border` extra pixels on every side.
///
/// The new pixels repeat the nearest edge pixel, so corners repeat the corner
/// pixel.
///
/// ## Failure
/// * The extended image is too big to allocate.
pub fn extend_borders(image: &Image, border: usize) -> ImagoResult<Image> {
  let (height, width) = (image.height(), image.width());
  if height == 0 || width == 0 {
    return Ok(Image::empty());
  }
  let too_big = RangeError::Dimensions { height, width };
  let grow = |len: usize| border.checked_mul(2).and_then(|b| b.checked_add(len));
  let ext_width = grow(width).ok_or(too_big)?;
  let ext_height = grow(height).ok_or(too_big)?;
  let count = ext_height.checked_mul(ext_width).ok_or(too_big)?;
  let mut pixels = Vec::new();
  pixels.try_reserve_exact(count).map_err(|_| too_big)?;
  let src = image.pixels();
  for ext_row in 0..ext_height {
    let row = ext_row.saturating_sub(border).min(height - 1);
    let src_row = &src[row * width..(row + 1) * width];
    pixels.extend(core::iter::repeat(src_row[0]).take(border));
    pixels.extend_from_slice(src_row);
    pixels.extend(core::iter::repeat(src_row[width - 1]).take(border));
  }
  Image::from_pixels(pixels, ext_height, ext_width)
}

impl Image {
  /// Blurs with a Gaussian of standard deviation `sigma`.
  ///
  /// The kernel isn't rescaled, so flat areas can shift slightly in
  /// brightness. See [`make_gauss_kernel`].
  ///
  /// ## Failure
  /// * `sigma` isn't finite and positive, or so big the kernel can't be built.
  ///   The image is unchanged.
  pub fn gaussian_blur(&mut self, sigma: f64) -> ImagoResult<()> {
    let kernel = make_gauss_kernel(sigma)?;
    let size = kernel.size();
    let extended = extend_borders(self, kernel.radius())?;
    let ext_width = extended.width();
    let ext = extended.pixels();
    let width = self.width();
    for (i, out) in self.pixels_mut().iter_mut().enumerate() {
      let (row, col) = (i / width, i % width);
      // the window's top left is at (row, col) in extended coordinates
      let mut acc = PixelAccumulator::default();
      for (k_row, k_weights) in kernel.weights().chunks_exact(size).enumerate() {
        let start = (row + k_row) * ext_width + col;
        for (p, w) in ext[start..start + size].iter().zip(k_weights) {
          acc.add_weighted(*p, *w);
        }
      }
      *out = acc.to_pixel();
    }
    Ok(())
  }
}
