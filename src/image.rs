#![forbid(unsafe_code)]

//! Provides the heap-allocated RGB image type.

use crate::{
  pixel::{clamp_truncate, Pixel},
  ImagoResult, RangeError,
};

/// Byte offset of the pixel data in a BMP written by this crate.
pub const DEFAULT_PIXEL_OFFSET: u32 = 14 + 40;

/// Converts a `(row, col)` position within a given `width` 2D space into a
/// linear index.
#[inline]
#[must_use]
pub const fn row_col_width_to_index(row: usize, col: usize, width: usize) -> usize {
  row * width + col
}

/// An RGB image, stored row-major.
///
/// * `pixels.len()` is always `height * width`.
/// * Row 0 is the first row stored in the source container. For an ordinary
///   (bottom-up) BMP that's the bottom scanline of the picture.
/// * `Clone` is a deep copy. Use [`Image::take`] to move the pixels out and
///   leave an empty image behind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
  height: usize,
  width: usize,
  offset: u32,
  pixels: Vec<Pixel>,
}
impl Default for Image {
  #[inline]
  fn default() -> Self {
    Self { height: 0, width: 0, offset: DEFAULT_PIXEL_OFFSET, pixels: Vec::new() }
  }
}
impl Image {
  /// An image with no pixels at all.
  #[inline]
  #[must_use]
  pub fn empty() -> Self {
    Self::default()
  }

  /// Makes a `height` by `width` image. All pixels start as black.
  ///
  /// ## Failure
  /// * `height * width` pixels can't be allocated.
  pub fn with_dimensions(height: usize, width: usize) -> ImagoResult<Self> {
    let too_big = RangeError::Dimensions { height, width };
    let count = height.checked_mul(width).ok_or(too_big)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(count).map_err(|_| too_big)?;
    pixels.resize(count, Pixel::BLACK);
    Ok(Self { height, width, offset: DEFAULT_PIXEL_OFFSET, pixels })
  }

  /// Builds an image from `height * width * 3` bytes in `r,g,b` order.
  ///
  /// Extra trailing bytes are ignored.
  ///
  /// ## Failure
  /// * The byte slice is too short.
  pub fn from_rgb_bytes(bytes: &[u8], height: usize, width: usize) -> ImagoResult<Self> {
    let count = height
      .checked_mul(width)
      .and_then(|c| c.checked_mul(3))
      .ok_or(RangeError::Dimensions { height, width })?;
    let (used, _) = crate::util::try_pull_slice(bytes, count)?;
    let pixels: Vec<Pixel> =
      used.chunks_exact(3).map(|c| Pixel::new(c[0], c[1], c[2])).collect();
    Ok(Self { height, width, offset: DEFAULT_PIXEL_OFFSET, pixels })
  }

  /// Builds an image around an existing pixel vector.
  pub fn from_pixels(pixels: Vec<Pixel>, height: usize, width: usize) -> ImagoResult<Self> {
    if height.checked_mul(width) != Some(pixels.len()) {
      return Err(RangeError::Dimensions { height, width }.into());
    }
    Ok(Self { height, width, offset: DEFAULT_PIXEL_OFFSET, pixels })
  }

  /// Moves the pixels out, leaving `self` as an empty image.
  #[inline]
  #[must_use]
  pub fn take(&mut self) -> Self {
    core::mem::take(self)
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> usize {
    self.height
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> usize {
    self.width
  }

  /// Total pixel count.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.pixels.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pixels.is_empty()
  }

  /// Where the pixel data started in the BMP this came from.
  ///
  /// Images made in memory use [`DEFAULT_PIXEL_OFFSET`].
  #[inline]
  #[must_use]
  pub const fn offset(&self) -> u32 {
    self.offset
  }

  #[inline]
  pub(crate) fn set_offset(&mut self, offset: u32) {
    self.offset = offset;
  }

  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[Pixel] {
    &self.pixels
  }

  #[inline]
  #[must_use]
  pub fn pixels_mut(&mut self) -> &mut [Pixel] {
    &mut self.pixels
  }

  /// The pixels as a flat run of bytes in `r,g,b` order.
  #[inline]
  #[must_use]
  pub fn as_rgb_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.pixels)
  }

  /// An owned copy of [`as_rgb_bytes`](Self::as_rgb_bytes).
  #[inline]
  #[must_use]
  pub fn to_rgb_bytes(&self) -> Vec<u8> {
    self.as_rgb_bytes().to_vec()
  }

  /// Gets a row of pixels.
  #[inline]
  pub fn row(&self, row: usize) -> ImagoResult<&[Pixel]> {
    if row < self.height {
      let start = row_col_width_to_index(row, 0, self.width);
      Ok(&self.pixels[start..start + self.width])
    } else {
      Err(RangeError::RowIndex { row, height: self.height }.into())
    }
  }

  /// Gets a row of pixels, mutably.
  #[inline]
  pub fn row_mut(&mut self, row: usize) -> ImagoResult<&mut [Pixel]> {
    if row < self.height {
      let start = row_col_width_to_index(row, 0, self.width);
      Ok(&mut self.pixels[start..start + self.width])
    } else {
      Err(RangeError::RowIndex { row, height: self.height }.into())
    }
  }

  /// Iterates the rows in storage order.
  #[inline]
  pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> + '_ {
    // `chunks_exact(0)` panics, and a zero width image has no pixels anyway.
    self.pixels.chunks_exact(self.width.max(1)).take(self.height)
  }

  #[inline]
  fn range_error(&self, row: usize, col: usize) -> RangeError {
    RangeError::PixelIndex { row, col, height: self.height, width: self.width }
  }

  /// Gets the pixel at the position.
  #[inline]
  pub fn get(&self, row: usize, col: usize) -> ImagoResult<Pixel> {
    if row < self.height && col < self.width {
      Ok(self.pixels[row_col_width_to_index(row, col, self.width)])
    } else {
      Err(self.range_error(row, col).into())
    }
  }

  /// Gets the pixel at the position, mutably.
  #[inline]
  pub fn get_mut(&mut self, row: usize, col: usize) -> ImagoResult<&mut Pixel> {
    if row < self.height && col < self.width {
      let i = row_col_width_to_index(row, col, self.width);
      Ok(&mut self.pixels[i])
    } else {
      Err(self.range_error(row, col).into())
    }
  }

  /// Sets the pixel at the position.
  #[inline]
  pub fn set(&mut self, row: usize, col: usize, p: Pixel) -> ImagoResult<()> {
    *self.get_mut(row, col)? = p;
    Ok(())
  }

  /// Zeroes every pixel with row in `start_row..end_row` and column in
  /// `start_col..end_col`.
  ///
  /// ## Failure
  /// * Either range reaches outside of the image.
  pub fn black_out_part(
    &mut self, start_row: usize, end_row: usize, start_col: usize, end_col: usize,
  ) -> ImagoResult<()> {
    if end_row > self.height || end_col > self.width {
      return Err(
        RangeError::Rect {
          rows: (start_row, end_row),
          cols: (start_col, end_col),
          height: self.height,
          width: self.width,
        }
        .into(),
      );
    }
    for row in start_row..end_row {
      let r = self.row_mut(row)?;
      for p in r.get_mut(start_col..end_col).unwrap_or_default() {
        *p = Pixel::BLACK;
      }
    }
    Ok(())
  }

  /// Makes the image grey with the historical `(r + 0.7152g + b) / 3`
  /// weighting.
  ///
  /// Note that red and blue are *not* luminance weighted here, and the sum is
  /// still divided by 3. Use [`grey_scale_luminance`](Self::grey_scale_luminance)
  /// for the Rec. 709 weights.
  pub fn grey_scale(&mut self) {
    for p in self.pixels.iter_mut() {
      let sum = f64::from(p.red) + f64::from(p.green) * 0.7152 + f64::from(p.blue);
      *p = Pixel::splat(clamp_truncate((sum + 0.5) / 3.0));
    }
  }

  /// Makes the image grey with Rec. 709 luma weights, then divides by 3 the
  /// same way [`grey_scale`](Self::grey_scale) does.
  pub fn grey_scale_luminance(&mut self) {
    for p in self.pixels.iter_mut() {
      let sum = f64::from(p.red) * 0.2126 + f64::from(p.green) * 0.7152 + f64::from(p.blue) * 0.0722;
      *p = Pixel::splat(clamp_truncate((sum + 0.5) / 3.0));
    }
  }

  /// Scales each channel by its own factor.
  pub fn color_mask(&mut self, red: f64, green: f64, blue: f64) {
    for p in self.pixels.iter_mut() {
      p.red = clamp_truncate(f64::from(p.red) * red);
      p.green = clamp_truncate(f64::from(p.green) * green);
      p.blue = clamp_truncate(f64::from(p.blue) * blue);
    }
  }

  /// Applies the classic sepia tone matrix.
  pub fn sepia(&mut self) {
    const SEPIA: [[f64; 3]; 3] =
      [[0.393, 0.769, 0.189], [0.349, 0.686, 0.168], [0.272, 0.534, 0.131]];
    for p in self.pixels.iter_mut() {
      let [r, g, b] = p.to_array().map(f64::from);
      let [out_r, out_g, out_b] =
        SEPIA.map(|[wr, wg, wb]| clamp_truncate(wr * r + wg * g + wb * b));
      *p = Pixel::new(out_r, out_g, out_b);
    }
  }

  /// Mirrors the image left to right.
  #[inline]
  pub fn reflect_horizontal(&mut self) {
    if self.width == 0 {
      return;
    }
    for row in self.pixels.chunks_exact_mut(self.width) {
      row.reverse();
    }
  }

  /// Flips the image top to bottom.
  #[inline]
  pub fn reflect_vertical(&mut self) {
    let width = self.width;
    if width == 0 {
      return;
    }
    let mut data: &mut [Pixel] = self.pixels.as_mut_slice();
    let mut temp_height = self.height;
    while temp_height > 1 {
      let (low, mid) = data.split_at_mut(width);
      let (mid, high) = mid.split_at_mut(mid.len() - width);
      low.swap_with_slice(high);
      data = mid;
      temp_height -= 2;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn numbered(height: usize, width: usize) -> Image {
    let bytes: Vec<u8> = (0..height * width * 3).map(|i| i as u8).collect();
    Image::from_rgb_bytes(&bytes, height, width).unwrap()
  }

  #[test]
  fn test_from_rgb_bytes_too_short() {
    assert!(Image::from_rgb_bytes(&[1, 2, 3, 4, 5], 1, 2).is_err());
    let img = Image::from_rgb_bytes(&[1, 2, 3, 4, 5, 6, 7], 1, 2).unwrap();
    assert_eq!(img.get(0, 1).unwrap(), Pixel::new(4, 5, 6));
    assert_eq!(img.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
  }

  #[test]
  fn test_with_dimensions() {
    let img = Image::with_dimensions(2, 3).unwrap();
    assert_eq!((img.height(), img.width(), img.len()), (2, 3, 6));
    assert!(img.pixels().iter().all(|p| *p == Pixel::BLACK));
    assert!(matches!(
      Image::with_dimensions(usize::MAX, 2),
      Err(crate::ImagoError::Range(RangeError::Dimensions { height: usize::MAX, width: 2 }))
    ));
    // the count fits in a usize but the bytes don't
    assert!(Image::with_dimensions(usize::MAX / 2, 1).is_err());
  }

  #[test]
  fn test_indexing_is_bounds_checked() {
    let mut img = numbered(2, 3);
    assert!(img.get(1, 2).is_ok());
    assert!(matches!(
      img.get(2, 0),
      Err(crate::ImagoError::Range(RangeError::PixelIndex { row: 2, col: 0, .. }))
    ));
    assert!(img.get_mut(0, 3).is_err());
    assert!(img.row(2).is_err());
    assert_eq!(img.row(1).unwrap().len(), 3);
    assert_eq!(img.rows().count(), 2);
  }

  #[test]
  fn test_take_leaves_empty() {
    let mut img = numbered(2, 2);
    let copy = img.clone();
    let moved = img.take();
    assert_eq!(moved, copy);
    assert_eq!(img.height(), 0);
    assert_eq!(img.width(), 0);
    assert!(img.is_empty());
  }

  #[test]
  fn test_black_out_part() {
    let mut img = Image::from_pixels(vec![Pixel::splat(9); 12], 3, 4).unwrap();
    img.black_out_part(1, 3, 2, 4).unwrap();
    for row in 0..3 {
      for col in 0..4 {
        let expected = if row >= 1 && col >= 2 { Pixel::BLACK } else { Pixel::splat(9) };
        assert_eq!(img.get(row, col).unwrap(), expected, "({row},{col})");
      }
    }
    assert!(img.black_out_part(0, 4, 0, 1).is_err());
  }

  #[test]
  fn test_grey_scale_keeps_historical_weights() {
    let mut img = Image::from_pixels(vec![Pixel::new(30, 100, 60)], 1, 1).unwrap();
    img.grey_scale();
    // (30 + 71.52 + 60 + 0.5) / 3 = 54.0066..
    assert_eq!(img.get(0, 0).unwrap(), Pixel::splat(54));

    let mut img = Image::from_pixels(vec![Pixel::new(255, 255, 255)], 1, 1).unwrap();
    img.grey_scale_luminance();
    // (255 * 1.0 + 0.5) / 3 = 85.16..
    assert_eq!(img.get(0, 0).unwrap(), Pixel::splat(85));
  }

  #[test]
  fn test_color_mask_and_sepia() {
    let mut img = Image::from_pixels(vec![Pixel::new(100, 200, 50)], 1, 1).unwrap();
    img.color_mask(2.0, 0.5, 10.0);
    assert_eq!(img.get(0, 0).unwrap(), Pixel::new(200, 100, 255));

    let mut img = Image::from_pixels(vec![Pixel::new(100, 100, 100)], 1, 1).unwrap();
    img.sepia();
    // 135.1, 120.3, 93.7
    assert_eq!(img.get(0, 0).unwrap(), Pixel::new(135, 120, 93));
  }

  #[test]
  fn test_reflections() {
    for (h, w) in [(1, 1), (2, 3), (3, 2), (4, 5)] {
      let original = numbered(h, w);
      let mut img = original.clone();
      img.reflect_horizontal();
      for row in 0..h {
        for col in 0..w {
          assert_eq!(img.get(row, col).unwrap(), original.get(row, w - 1 - col).unwrap());
        }
      }
      img.reflect_horizontal();
      assert_eq!(img, original);
      img.reflect_vertical();
      for row in 0..h {
        assert_eq!(img.row(row).unwrap(), original.row(h - 1 - row).unwrap());
      }
    }
  }
}
