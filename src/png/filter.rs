//! PNG scanline filtering.
//!
//! Each scanline is a filter type byte followed by the row's bytes. Every
//! filter predicts a byte from its neighbors: `a` to the left, `b` above, and
//! `c` above-left, counting in whole pixels (`bpp` bytes). Neighbors outside
//! the image are 0, and all arithmetic wraps modulo 256.

use super::*;

/// The five PNG filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FilterType {
  #[default]
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl FilterType {
  pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];

  /// The value predicted for a byte given its left, up, and up-left neighbors.
  #[inline]
  #[must_use]
  pub const fn predict(self, a: u8, b: u8, c: u8) -> u8 {
    match self {
      Self::None => 0,
      Self::Sub => a,
      Self::Up => b,
      Self::Average => ((a as u16 + b as u16) / 2) as u8,
      Self::Paeth => paeth_predictor(a, b, c),
    }
  }
}
impl TryFrom<u8> for FilterType {
  type Error = RangeError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(RangeError::FilterType(other)),
    })
  }
}

/// Picks whichever of `a`, `b`, or `c` is closest to `a + b - c`.
///
/// Ties go to `a`, then `b`.
#[inline]
#[must_use]
pub const fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests is part of the format.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Filters `height` rows of `row_bytes` bytes each, all with the same filter.
///
/// The output has one filter type byte in front of every row.
#[must_use]
pub fn filter_rows(raw: &[u8], height: usize, row_bytes: usize, bpp: usize, ty: FilterType) -> Vec<u8> {
  let mut out = Vec::with_capacity(height * (row_bytes + 1));
  let mut prev: Option<&[u8]> = None;
  for cur in raw.chunks_exact(row_bytes.max(1)).take(if row_bytes == 0 { 0 } else { height }) {
    out.push(ty as u8);
    for (i, x) in cur.iter().copied().enumerate() {
      let a = if i >= bpp { cur[i - bpp] } else { 0 };
      let b = prev.map_or(0, |p| p[i]);
      let c = if i >= bpp { prev.map_or(0, |p| p[i - bpp]) } else { 0 };
      out.push(x.wrapping_sub(ty.predict(a, b, c)));
    }
    prev = Some(cur);
  }
  if row_bytes == 0 {
    out.resize(height, ty as u8);
  }
  out
}

/// Reverses the filtering of `height` scanlines in place.
///
/// Afterwards every filter byte is reset to 0 (None), so running this a
/// second time does nothing.
///
/// ## Failure
/// * Fewer than `height * (row_bytes + 1)` bytes.
/// * A filter type byte above 4. Rows before it are already unfiltered.
pub fn unfilter_in_place(
  data: &mut [u8], height: usize, row_bytes: usize, bpp: usize,
) -> ImagoResult<()> {
  let line = row_bytes + 1;
  let needed = line.checked_mul(height).ok_or(RangeError::Dimensions { height, width: row_bytes })?;
  if data.len() < needed {
    return Err(FormatError::NotEnoughBytes { expected: needed, actual: data.len() }.into());
  }
  for y in 0..height {
    let (done, todo) = data.split_at_mut(y * line);
    let prev: Option<&[u8]> = if y == 0 { None } else { Some(&done[(y - 1) * line + 1..]) };
    let (f, cur) = todo[..line].split_at_mut(1);
    let ty = FilterType::try_from(f[0])?;
    for i in 0..cur.len() {
      let a = if i >= bpp { cur[i - bpp] } else { 0 };
      let b = prev.map_or(0, |p| p[i]);
      let c = if i >= bpp { prev.map_or(0, |p| p[i - bpp]) } else { 0 };
      cur[i] = cur[i].wrapping_add(ty.predict(a, b, c));
    }
    f[0] = FilterType::None as u8;
  }
  Ok(())
}

/// Filters every row of the image with `ty`, giving `height` scanlines of
/// `1 + 3 * width` bytes.
#[inline]
#[must_use]
pub fn filter(image: &Image, ty: FilterType) -> Vec<u8> {
  filter_rows(image.as_rgb_bytes(), image.height(), image.width() * 3, 3, ty)
}

/// Rebuilds an image from `height` filtered RGB scanlines of `width` pixels.
///
/// ## Failure
/// * `data` isn't exactly `height * (1 + 3 * width)` bytes.
/// * A filter type byte above 4.
pub fn defilter(data: &[u8], height: usize, width: usize) -> ImagoResult<Image> {
  let row_bytes = width.checked_mul(3).ok_or(RangeError::Dimensions { height, width })?;
  let expected =
    (row_bytes + 1).checked_mul(height).ok_or(RangeError::Dimensions { height, width })?;
  if data.len() != expected {
    return Err(FormatError::LengthMismatch { expected, actual: data.len() }.into());
  }
  let mut buf = data.to_vec();
  unfilter_in_place(&mut buf, height, row_bytes, 3)?;
  let rgb: Vec<u8> =
    buf.chunks_exact(row_bytes + 1).flat_map(|line| line[1..].iter().copied()).collect();
  Image::from_rgb_bytes(&rgb, height, width)
}

impl Image {
  /// Same as [`filter`].
  #[inline]
  #[must_use]
  pub fn to_scanlines(&self, ty: FilterType) -> Vec<u8> {
    filter(self, ty)
  }
}
