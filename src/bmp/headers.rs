use pack1::*;

use super::*;

/// The 14 byte header at the start of all BMP files.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
#[allow(dead_code)]
pub(crate) struct BitmapFileHeader {
  pub tag: [u8; 2],
  pub file_size: U32LE,
  pub reserved1: U16LE,
  pub reserved2: U16LE,
  pub bitmap_offset: U32LE,
}

/// The 40 byte `BITMAPINFOHEADER`.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
#[allow(dead_code)]
pub(crate) struct BitmapInfoHeader {
  pub size: U32LE,
  pub width: I32LE,
  pub height: I32LE,
  pub planes: U16LE,
  pub bits_per_pixel: U16LE,
  pub compression: U32LE,
  pub image_size: U32LE,
  pub pixels_per_meter_x: I32LE,
  pub pixels_per_meter_y: I32LE,
  pub colors_used: U32LE,
  pub important_colors: U32LE,
}

const _: () = assert!(core::mem::size_of::<BitmapFileHeader>() == BMP_FILE_HEADER_SIZE);
const _: () = assert!(core::mem::size_of::<BitmapInfoHeader>() == BMP_INFO_HEADER_SIZE);

/// The parts of a BMP's headers that this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BmpHeader {
  /// The size the file claims to be.
  pub file_size: u32,
  /// Byte offset of the pixel array.
  pub pixel_offset: u32,
  pub width: u32,
  /// Always positive, see `top_down`.
  pub height: u32,
  /// The stored height was negative: rows run top to bottom.
  pub top_down: bool,
  pub bits_per_pixel: u16,
  pub compression: u32,
}
impl BmpHeader {
  /// Bytes of zero padding after each row of `width` BGR pixels.
  #[inline]
  #[must_use]
  pub const fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
  }

  /// Bytes per stored row, padding included.
  #[inline]
  #[must_use]
  pub const fn row_stride(width: usize) -> usize {
    width * 3 + Self::row_padding(width)
  }
}

/// Parses and checks the file and info headers.
///
/// Returns the header along with all of the bytes after the info header.
pub fn bmp_get_header(bytes: &[u8]) -> Result<(BmpHeader, &[u8]), FormatError> {
  let (file_header, rest) = try_pull_pod::<BitmapFileHeader>(bytes)?;
  if file_header.tag != *b"BM" {
    return Err(FormatError::BadBmpMagic);
  }
  let pixel_offset = file_header.bitmap_offset.get();
  if (pixel_offset as usize) < BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE {
    return Err(FormatError::PixelOffsetTooSmall(pixel_offset));
  }
  let (info, rest) = try_pull_pod::<BitmapInfoHeader>(rest)?;
  log::trace!("{file_header:?} {info:?}");
  let width = info.width.get();
  if width < 0 {
    return Err(FormatError::NegativeBmpWidth(width));
  }
  let height = info.height.get();
  let header = BmpHeader {
    file_size: file_header.file_size.get(),
    pixel_offset,
    width: width.unsigned_abs(),
    height: height.unsigned_abs(),
    top_down: height < 0,
    bits_per_pixel: info.bits_per_pixel.get(),
    compression: info.compression.get(),
  };
  if header.bits_per_pixel != 24 || header.compression != BI_RGB {
    return Err(FormatError::UnsupportedBmp {
      bits_per_pixel: header.bits_per_pixel,
      compression: header.compression,
    });
  }
  Ok((header, rest))
}

/// Writes the canonical 14 byte file header.
#[inline]
#[must_use]
pub(crate) fn file_header_bytes(file_size: u32) -> [u8; BMP_FILE_HEADER_SIZE] {
  let mut a = [0; BMP_FILE_HEADER_SIZE];
  a[0..2].copy_from_slice(b"BM");
  a[2..6].copy_from_slice(&file_size.to_le_bytes());
  // 4 reserved bytes are left blank
  a[10..14].copy_from_slice(&(BMP_FILE_HEADER_SIZE as u32 + BMP_INFO_HEADER_SIZE as u32).to_le_bytes());
  a
}

/// Writes the canonical 40 byte info header for a 24bpp image.
#[inline]
#[must_use]
pub(crate) fn info_header_bytes(width: i32, height: i32) -> [u8; BMP_INFO_HEADER_SIZE] {
  let mut a = [0; BMP_INFO_HEADER_SIZE];
  a[0..4].copy_from_slice(&(BMP_INFO_HEADER_SIZE as u32).to_le_bytes());
  a[4..8].copy_from_slice(&width.to_le_bytes());
  a[8..12].copy_from_slice(&height.to_le_bytes());
  a[12..14].copy_from_slice(&1_u16.to_le_bytes());
  a[14..16].copy_from_slice(&24_u16.to_le_bytes());
  // compression, image size, resolution, and color counts are all 0
  a
}
