use std::{fs, path::Path};

use super::*;

/// Everything pulled out of a PNG's chunk stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PngData {
  pub ihdr: Ihdr,
  /// Every chunk in file order, `IHDR` and `IEND` included.
  pub chunks: Vec<Chunk>,
  /// The data of all `IDAT` chunks joined in file order. This is still zlib
  /// compressed.
  pub idat: Vec<u8>,
}

/// Checks if the first 8 bytes are the PNG signature.
#[inline]
#[must_use]
pub fn is_png_signature_correct(bytes: &[u8]) -> bool {
  bytes.starts_with(&PNG_SIGNATURE)
}

/// Reads a whole PNG chunk stream out of memory.
///
/// ## Failure
/// * Missing signature.
/// * Any chunk is truncated, has a non-alphabetic type, or has a bad CRC.
/// * The first chunk isn't a 13 byte `IHDR`, or the `IHDR` isn't 8-bit RGBA
///   without interlacing.
/// * No `IEND` chunk.
pub fn parse_png_bytes(bytes: &[u8]) -> ImagoResult<PngData> {
  if !is_png_signature_correct(bytes) {
    return Err(FormatError::BadPngSignature.into());
  }
  let mut it = RawChunkIter::new(&bytes[PNG_SIGNATURE.len()..]);

  let first = it.next().ok_or(FormatError::FirstChunkNotIhdr)??;
  if first.ty != ChunkType::IHDR {
    return Err(FormatError::FirstChunkNotIhdr.into());
  }
  first.check_crc()?;
  let ihdr = Ihdr::parse(first.data)?;
  log::trace!("{ihdr:?}");

  let mut out = PngData { ihdr, chunks: vec![first.to_chunk()], idat: Vec::new() };
  for raw in it {
    let raw = raw?;
    raw.check_crc()?;
    log::trace!("{raw:?}");
    if raw.ty == ChunkType::IDAT {
      out.idat.extend_from_slice(raw.data);
    }
    out.chunks.push(raw.to_chunk());
    if raw.ty == ChunkType::IEND {
      log::debug!(
        "png parsed: {}x{}, {} chunks, {} IDAT bytes",
        ihdr.width,
        ihdr.height,
        out.chunks.len(),
        out.idat.len()
      );
      return Ok(out);
    }
  }
  Err(FormatError::MissingIend.into())
}

/// Reads the PNG at `path`, giving the header and the joined `IDAT` bytes.
pub fn parse_chunks(path: impl AsRef<Path>) -> ImagoResult<(Ihdr, Vec<u8>)> {
  let path = path.as_ref();
  let bytes = fs::read(path)?;
  match parse_png_bytes(&bytes) {
    Ok(PngData { ihdr, idat, .. }) => Ok((ihdr, idat)),
    Err(e) => {
      log::warn!("{}: {e}", path.display());
      Err(e)
    }
  }
}
