//! Adam7 interlacing.
//!
//! Every 8x8 block of the image is split across seven passes like this:
//!
//! ```txt
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```
//!
//! Each pass forms its own smaller "reduced image".

use super::*;

/// Gets the `(width, height)` of the full image (index 0) and of each reduced
/// image (indexes 1 through 7).
#[must_use]
pub const fn reduced_image_dimensions(full_width: usize, full_height: usize) -> [(usize, usize); 8] {
  let (w, h) = (full_width, full_height);
  [
    (w, h),
    ((w + 7) / 8, (h + 7) / 8),
    ((w + 3) / 8, (h + 7) / 8),
    ((w + 3) / 4, (h + 3) / 8),
    ((w + 1) / 4, (h + 3) / 4),
    ((w + 1) / 2, (h + 1) / 4),
    (w / 2, (h + 1) / 2),
    (w, h / 2),
  ]
}

/// Converts a position within a reduced image to the full image position.
///
/// Pass 0 is the full image. Passes above 7 give `None`.
#[must_use]
#[allow(clippy::identity_op)]
pub const fn interlaced_pos_to_full_pos(
  pass: usize, reduced_x: usize, reduced_y: usize,
) -> Option<(usize, usize)> {
  Some(match pass {
    0 => (reduced_x, reduced_y),
    1 => (reduced_x * 8 + 0, reduced_y * 8 + 0),
    2 => (reduced_x * 8 + 4, reduced_y * 8 + 0),
    3 => (reduced_x * 4 + 0, reduced_y * 8 + 4),
    4 => (reduced_x * 4 + 2, reduced_y * 4 + 0),
    5 => (reduced_x * 2 + 0, reduced_y * 4 + 2),
    6 => (reduced_x * 2 + 1, reduced_y * 2 + 0),
    7 => (reduced_x * 1 + 0, reduced_y * 2 + 1),
    _ => return None,
  })
}

/// The newest of the first `passes` passes that covers `(row, col)`, along
/// with where to look in that pass.
///
/// A pass "covers" the area from its own pixel up to the next pixel of an
/// equal or earlier pass, so with fewer than 7 passes the gaps are filled by
/// repeating the pixels already seen.
#[inline]
const fn source_of(passes: usize, row: usize, col: usize) -> (usize, usize, usize) {
  let (r, c) = (row % 8, col % 8);
  if passes >= 7 && r % 2 == 1 {
    (7, row / 2, col)
  } else if passes >= 6 && c % 2 == 1 {
    (6, row / 2, col / 2)
  } else if passes >= 5 && r % 4 >= 2 {
    (5, row / 4, col / 2)
  } else if passes >= 4 && c % 4 >= 2 {
    (4, row / 4, col / 4)
  } else if passes >= 3 && r >= 4 {
    (3, row / 8, col / 4)
  } else if passes >= 2 && c >= 4 {
    (2, row / 8, col / 8)
  } else {
    (1, row / 8, col / 8)
  }
}

impl Image {
  /// Splits the image into its seven reduced images.
  ///
  /// A reduced image can have a width or height of 0.
  pub fn adam7_split(&self) -> ImagoResult<Vec<Image>> {
    let dims = reduced_image_dimensions(self.width(), self.height());
    let mut out = Vec::with_capacity(7);
    for (pass, &(w, h)) in dims.iter().enumerate().skip(1) {
      let mut pixels = Vec::with_capacity(w * h);
      for y in 0..h {
        for x in 0..w {
          let (full_x, full_y) = interlaced_pos_to_full_pos(pass, x, y).unwrap_or((x, y));
          pixels.push(self.get(full_y, full_x)?);
        }
      }
      out.push(Image::from_pixels(pixels, h, w)?);
    }
    Ok(out)
  }
}

/// Rebuilds a `height` by `width` image from the first `passes.len()` reduced
/// images.
///
/// With all 7 passes this exactly undoes [`Image::adam7_split`]. With fewer,
/// each missing pixel copies the closest earlier pixel above and to the left
/// of it within its 8x8 block, which is how a progressive decoder would
/// display the partial image.
///
/// ## Failure
/// * Zero passes or more than 7.
/// * A reduced image isn't the size its pass should be.
pub fn adam7_merge(passes: &[Image], height: usize, width: usize) -> ImagoResult<Image> {
  if passes.is_empty() || passes.len() > 7 {
    return Err(RangeError::PassCount(passes.len()).into());
  }
  let dims = reduced_image_dimensions(width, height);
  for (i, (sub, &(w, h))) in passes.iter().zip(&dims[1..]).enumerate() {
    if (sub.height(), sub.width()) != (h, w) {
      return Err(
        RangeError::PassDimensions {
          pass: i + 1,
          expected: (h, w),
          actual: (sub.height(), sub.width()),
        }
        .into(),
      );
    }
  }
  let mut pixels = Vec::with_capacity(height * width);
  for row in 0..height {
    for col in 0..width {
      let (pass, sub_row, sub_col) = source_of(passes.len(), row, col);
      pixels.push(passes[pass - 1].get(sub_row, sub_col)?);
    }
  }
  log::trace!("adam7: merged {} passes into {height}x{width}", passes.len());
  Image::from_pixels(pixels, height, width)
}
