use core::fmt::{Debug, Write};

use super::*;

/// The four byte name of a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");

  /// Chunk names are made of ASCII letters only.
  #[inline]
  #[must_use]
  pub const fn is_valid(self) -> bool {
    let [a, b, c, d] = self.0;
    a.is_ascii_alphabetic()
      && b.is_ascii_alphabetic()
      && c.is_ascii_alphabetic()
      && d.is_ascii_alphabetic()
  }

  /// Lowercase first letter means the chunk is safe to ignore.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    self.0[0].is_ascii_lowercase()
  }
}
impl Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for b in self.0 {
      f.write_char(b as char)?;
    }
    Ok(())
  }
}

/// A chunk that has been split out of the PNG bytes, but not yet checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawChunk<'b> {
  pub ty: ChunkType,
  pub data: &'b [u8],
  pub declared_crc: u32,
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl RawChunk<'_> {
  /// The CRC of the type and data.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(&self.ty.0, self.data)
  }

  /// Errors if the declared CRC is wrong.
  #[inline]
  pub fn check_crc(&self) -> Result<(), FormatError> {
    let actual = self.actual_crc();
    if actual == self.declared_crc {
      Ok(())
    } else {
      Err(FormatError::CrcMismatch { ty: self.ty.0, declared: self.declared_crc, actual })
    }
  }

  #[inline]
  #[must_use]
  pub fn to_chunk(&self) -> Chunk {
    Chunk {
      length: self.data.len() as u32,
      ty: self.ty,
      data: self.data.to_vec(),
      crc: self.declared_crc,
    }
  }
}

/// An owned, verified chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
  /// Always `data.len()`.
  pub length: u32,
  pub ty: ChunkType,
  pub data: Vec<u8>,
  pub crc: u32,
}

/// An iterator over the chunks after the PNG signature.
///
/// Unlike a lenient decoder this stops with an error as soon as the bytes run
/// short or a chunk type isn't alphabetic. After an error it yields nothing
/// more.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RawChunkIter<'b>(&'b [u8]);
impl<'b> RawChunkIter<'b> {
  /// `bytes` should already have the signature removed.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self(bytes)
  }

  fn pull(&mut self) -> Result<RawChunk<'b>, FormatError> {
    let (len_bytes, rest) = try_pull_byte_array::<4>(self.0)?;
    let (ty_bytes, rest) = try_pull_byte_array::<4>(rest)?;
    let ty = ChunkType(ty_bytes);
    if !ty.is_valid() {
      return Err(FormatError::InvalidChunkType(ty_bytes));
    }
    let (data, rest) = try_pull_slice(rest, u32_be(len_bytes) as usize)?;
    let (crc_bytes, rest) = try_pull_byte_array::<4>(rest)?;
    self.0 = rest;
    Ok(RawChunk { ty, data, declared_crc: u32_be(crc_bytes) })
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = Result<RawChunk<'b>, FormatError>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.0.is_empty() {
      return None;
    }
    let out = self.pull();
    if out.is_err() {
      self.0 = &[];
    }
    Some(out)
  }
}

#[cfg(test)]
pub(crate) fn chunk_bytes(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(12 + data.len());
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(ty);
  out.extend_from_slice(data);
  out.extend_from_slice(&chunk_crc(ty, data).to_be_bytes());
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_chunk_type_validity() {
    assert!(ChunkType::IHDR.is_valid());
    assert!(ChunkType(*b"tEXt").is_valid());
    assert!(ChunkType(*b"tEXt").is_ancillary());
    assert!(!ChunkType::IDAT.is_ancillary());
    assert!(!ChunkType(*b"IH R").is_valid());
    assert!(!ChunkType(*b"ID4T").is_valid());
    assert_eq!(format!("{:?}", ChunkType::IEND), "IEND");
  }

  #[test]
  fn test_iter_splits_chunks() {
    let mut bytes = chunk_bytes(b"abCD", &[1, 2, 3]);
    bytes.extend(chunk_bytes(b"IEND", &[]));
    let chunks: Vec<_> = RawChunkIter::new(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].ty, ChunkType(*b"abCD"));
    assert_eq!(chunks[0].data, &[1, 2, 3]);
    assert!(chunks[0].check_crc().is_ok());
    assert_eq!(chunks[1].declared_crc, 0xAE42_6082);
    assert_eq!(chunks[0].to_chunk().length, 3);
  }

  #[test]
  fn test_iter_errors_then_stops() {
    let mut bytes = chunk_bytes(b"abCD", &[1, 2, 3]);
    bytes.truncate(bytes.len() - 2);
    let mut it = RawChunkIter::new(&bytes);
    assert!(matches!(it.next(), Some(Err(FormatError::NotEnoughBytes { .. }))));
    assert!(it.next().is_none());

    let bytes = chunk_bytes(b"ab1D", &[]);
    let mut it = RawChunkIter::new(&bytes);
    assert_eq!(it.next(), Some(Err(FormatError::InvalidChunkType(*b"ab1D"))));
    assert!(it.next().is_none());
  }

  #[test]
  fn test_crc_bit_flip() {
    let mut bytes = chunk_bytes(b"IDAT", &[0x55; 10]);
    bytes[8 + 4] ^= 0b0001_0000;
    let chunk = RawChunkIter::new(&bytes).next().unwrap().unwrap();
    assert!(matches!(chunk.check_crc(), Err(FormatError::CrcMismatch { ty: [b'I', b'D', b'A', b'T'], .. })));
  }
}
