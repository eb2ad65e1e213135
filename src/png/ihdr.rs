use pack1::U32BE;

use super::*;

/// The exact layout of `IHDR` chunk data.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
struct IhdrData {
  width: U32BE,
  height: U32BE,
  bit_depth: u8,
  color_type: u8,
  compression_method: u8,
  filter_method: u8,
  interlace_method: u8,
}
const _: () = assert!(core::mem::size_of::<IhdrData>() == IHDR_DATA_LEN);

/// Size of the `IHDR` chunk data.
pub const IHDR_DATA_LEN: usize = 13;

/// Truecolor with alpha.
pub const COLOR_TYPE_RGBA: u8 = 6;

/// Image header, the first chunk of every PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ihdr {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_type: u8,
  pub compression_method: u8,
  pub filter_method: u8,
  pub interlace_method: u8,
}
impl Ihdr {
  /// Parses the header data, accepting only 8-bit RGBA with every method
  /// set to 0.
  pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
    if data.len() != IHDR_DATA_LEN {
      return Err(FormatError::FirstChunkNotIhdr);
    }
    let (raw, _) = try_pull_pod::<IhdrData>(data)?;
    let ihdr = Self {
      width: raw.width.get(),
      height: raw.height.get(),
      bit_depth: raw.bit_depth,
      color_type: raw.color_type,
      compression_method: raw.compression_method,
      filter_method: raw.filter_method,
      interlace_method: raw.interlace_method,
    };
    if ihdr.is_supported() {
      Ok(ihdr)
    } else {
      Err(FormatError::UnsupportedIhdr {
        bit_depth: ihdr.bit_depth,
        color_type: ihdr.color_type,
        compression_method: ihdr.compression_method,
        filter_method: ihdr.filter_method,
        interlace_method: ihdr.interlace_method,
      })
    }
  }

  #[inline]
  #[must_use]
  pub const fn is_supported(&self) -> bool {
    self.bit_depth == 8
      && self.color_type == COLOR_TYPE_RGBA
      && self.compression_method == 0
      && self.filter_method == 0
      && self.interlace_method == 0
  }

  /// Bytes per pixel of the filtered data.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    4
  }
}
