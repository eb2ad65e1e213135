#![forbid(unsafe_code)]

//! Module for Windows Bitmap files (BMP).
//!
//! Only the most common layout is handled: a 40 byte info header and
//! uncompressed 24 bits per pixel data.
//!
//! ## The Format
//!
//! Note: All multi-byte values in BMP are always little-endian encoded.
//!
//! * A 14 byte "file header": the `BM` tag, the total file size, 4 reserved
//!   bytes, and the offset of the pixel array.
//! * A 40 byte "info header": its own size, the width and height (both
//!   signed), planes, bits per pixel, compression, and some fields that are
//!   always 0 in files written by this crate.
//! * Maybe a gap, up to the pixel array offset.
//! * The pixel array. Each pixel is `[b, g, r]`, and each row is padded with
//!   zeroes to a multiple of 4 bytes. Rows are stored bottom-up, unless the
//!   height was negative, in which case they're top-down.
//!
//! Decoding keeps the rows in the order they're stored, then flips top-down
//! images once at the end. Either way row 0 of the [`Image`] is the bottom
//! row of the picture.

use std::{fs, path::Path};

use crate::{util::*, FormatError, Image, ImagoResult, Pixel, RangeError};

mod headers;
pub use headers::*;

/// Size of the file header.
pub const BMP_FILE_HEADER_SIZE: usize = 14;

/// Size of the only supported info header version.
pub const BMP_INFO_HEADER_SIZE: usize = 40;

/// No compression.
const BI_RGB: u32 = 0;

/// Decodes BMP bytes into an image.
///
/// ## Failure
/// * Wrong magic bytes.
/// * The pixel data offset is inside the headers.
/// * A negative width.
/// * Anything other than 24bpp uncompressed data.
/// * The data ends before all the rows are read.
pub fn bmp_decode(bytes: &[u8]) -> ImagoResult<Image> {
  let (header, _) = bmp_get_header(bytes)?;
  let width = header.width as usize;
  let height = header.height as usize;
  let stride = BmpHeader::row_stride(width);
  let pixel_bytes = bytes.get(header.pixel_offset as usize..).unwrap_or_default();
  let needed = stride.checked_mul(height).ok_or(RangeError::Dimensions { height, width })?;
  if pixel_bytes.len() < needed {
    log::warn!("bmp: {} pixel bytes, need {needed}", pixel_bytes.len());
    return Err(FormatError::NotEnoughBytes { expected: needed, actual: pixel_bytes.len() }.into());
  }
  let mut pixels = Vec::with_capacity(width * height);
  if width > 0 {
    for row in pixel_bytes.chunks_exact(stride).take(height) {
      pixels.extend(row[..width * 3].chunks_exact(3).map(|bgr| Pixel::new(bgr[2], bgr[1], bgr[0])));
    }
  }
  let mut image = Image::from_pixels(pixels, height, width)?;
  image.set_offset(header.pixel_offset);
  if header.top_down {
    image.reflect_vertical();
  }
  log::debug!(
    "bmp decoded: {width}x{height}, offset {}, top_down {}",
    header.pixel_offset,
    header.top_down
  );
  Ok(image)
}

/// Encodes an image as a bottom-up 24bpp BMP.
///
/// ## Failure
/// * The image is too big for the 32-bit header fields.
pub fn bmp_encode(image: &Image) -> ImagoResult<Vec<u8>> {
  let (height, width) = (image.height(), image.width());
  let too_big = RangeError::Dimensions { height, width };
  let w = i32::try_from(width).map_err(|_| too_big)?;
  let h = i32::try_from(height).map_err(|_| too_big)?;
  let padding = BmpHeader::row_padding(width);
  let file_size = BmpHeader::row_stride(width)
    .checked_mul(height)
    .and_then(|px| px.checked_add(BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE))
    .and_then(|total| u32::try_from(total).ok())
    .ok_or(too_big)?;

  let mut out = Vec::with_capacity(file_size as usize);
  out.extend_from_slice(&file_header_bytes(file_size));
  out.extend_from_slice(&info_header_bytes(w, h));
  for row in image.rows() {
    for p in row {
      out.extend_from_slice(&[p.blue, p.green, p.red]);
    }
    out.extend(core::iter::repeat(0).take(padding));
  }
  debug_assert_eq!(out.len(), file_size as usize);
  Ok(out)
}

/// Reads and decodes the BMP file at `path`.
pub fn decode(path: impl AsRef<Path>) -> ImagoResult<Image> {
  let path = path.as_ref();
  let bytes = fs::read(path)?;
  bmp_decode(&bytes).map_err(|e| {
    log::warn!("{}: {e}", path.display());
    e
  })
}

/// Encodes `image` and writes it to `path`.
///
/// The file is written next to the destination first and then renamed over
/// it, so a failure never leaves a half written file at `path`.
pub fn encode(image: &Image, path: impl AsRef<Path>) -> ImagoResult<()> {
  let path = path.as_ref();
  let bytes = bmp_encode(image)?;
  let mut temp = path.as_os_str().to_owned();
  temp.push(".tmp");
  if let Err(e) = fs::write(&temp, &bytes).and_then(|()| fs::rename(&temp, path)) {
    let _ = fs::remove_file(&temp);
    return Err(e.into());
  }
  log::debug!("bmp written: {} ({} bytes)", path.display(), bytes.len());
  Ok(())
}
