use thiserror::Error;

/// An error from the `imago` crate.
///
/// Every fallible operation reports exactly one of these and leaves no partial
/// output behind.
#[derive(Debug, Error)]
pub enum ImagoError {
  /// A file couldn't be opened, read, written, or renamed.
  #[error("i/o failure: {0}")]
  Io(#[from] std::io::Error),

  /// The data doesn't follow the container format.
  #[error("format error: {0}")]
  Format(#[from] FormatError),

  /// An index, count, or parameter is outside of the supported range.
  #[error("range error: {0}")]
  Range(#[from] RangeError),
}

/// Shorthand for results using [`ImagoError`].
pub type ImagoResult<T> = Result<T, ImagoError>;

/// The ways that input bytes can fail to be a valid image container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum FormatError {
  /// The first two bytes of the file weren't `BM`.
  #[error("missing `BM` magic bytes")]
  BadBmpMagic,
  /// The declared pixel data offset points inside of the headers.
  #[error("pixel data offset {0} is smaller than the 54 header bytes")]
  PixelOffsetTooSmall(u32),
  /// The info header's width was negative. Only the height is signed.
  #[error("negative bmp width {0}")]
  NegativeBmpWidth(i32),
  /// Only uncompressed 24 bits per pixel data is handled.
  #[error("unsupported bmp layout: {bits_per_pixel} bpp, compression {compression}")]
  UnsupportedBmp { bits_per_pixel: u16, compression: u32 },
  /// The input ended before all declared bytes were found.
  #[error("expected {expected} bytes, found {actual}")]
  NotEnoughBytes { expected: usize, actual: usize },
  /// A buffer that must be an exact size wasn't.
  #[error("expected exactly {expected} bytes, found {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  /// The first eight bytes weren't the PNG signature.
  #[error("bad png signature")]
  BadPngSignature,
  /// A chunk type contained a byte outside of `A-Za-z`.
  #[error("chunk type {0:?} is not alphabetic")]
  InvalidChunkType([u8; 4]),
  /// The CRC stored with a chunk didn't match the computed CRC.
  #[error("crc mismatch in {ty:?} chunk: declared {declared:#010X}, computed {actual:#010X}")]
  CrcMismatch { ty: [u8; 4], declared: u32, actual: u32 },
  /// The first chunk must be a 13 byte `IHDR`.
  #[error("first chunk is not a 13 byte IHDR")]
  FirstChunkNotIhdr,
  /// The header describes an image layout this crate doesn't decode.
  #[error(
    "unsupported IHDR: depth {bit_depth}, color {color_type}, methods {compression_method}/{filter_method}/{interlace_method}"
  )]
  UnsupportedIhdr {
    bit_depth: u8,
    color_type: u8,
    compression_method: u8,
    filter_method: u8,
    interlace_method: u8,
  },
  /// The chunk stream ran out before an `IEND` chunk.
  #[error("no IEND chunk")]
  MissingIend,
  /// The zlib stream inside the `IDAT` chunks was broken.
  #[error("the IDAT data could not be inflated")]
  Inflate,
}

/// The ways that an index, count, or parameter can be out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum RangeError {
  /// A pixel position outside of the image.
  #[error("pixel ({row}, {col}) is outside of a {height}x{width} image")]
  PixelIndex { row: usize, col: usize, height: usize, width: usize },
  /// A row outside of the image.
  #[error("row {row} is outside of an image with {height} rows")]
  RowIndex { row: usize, height: usize },
  /// A rectangle that isn't fully inside of the image.
  #[error("rows {rows:?} / cols {cols:?} don't fit in a {height}x{width} image")]
  Rect { rows: (usize, usize), cols: (usize, usize), height: usize, width: usize },
  /// Scanline filter types are `0..=4`.
  #[error("filter type {0} is not in 0..=4")]
  FilterType(u8),
  /// Adam7 recomposition takes `1..=7` passes.
  #[error("{0} passes given, expected 1 through 7")]
  PassCount(usize),
  /// A reduced image doesn't have the size its pass requires.
  #[error("pass {pass} is {actual:?} (h, w), expected {expected:?}")]
  PassDimensions { pass: usize, expected: (usize, usize), actual: (usize, usize) },
  /// A normalized kernel found nothing to average.
  #[error("no valid neighbors to normalize by")]
  NoValidNeighbors,
  /// Gaussian kernels need a finite, positive standard deviation.
  #[error("sigma {0} is not a positive finite number")]
  Sigma(f64),
  /// The image is too large for the container's 32-bit fields.
  #[error("dimensions {height}x{width} don't fit the container")]
  Dimensions { height: usize, width: usize },
}
