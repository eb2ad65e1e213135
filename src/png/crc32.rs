//! The CRC-32 used by PNG chunks (ISO 3309, reflected polynomial
//! `0xEDB88320`).
//!
//! A chunk's CRC covers its type and then its data, but not the length.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Remainder of each possible low byte, worked out at compile time.
static REMAINDERS: [u32; 256] = {
  let mut table = [0_u32; 256];
  let mut i = 0_usize;
  while i < table.len() {
    let mut rem = i as u32;
    let mut bit = 0;
    while bit < 8 {
      let carry = rem & 1;
      rem >>= 1;
      if carry == 1 {
        rem ^= POLYNOMIAL;
      }
      bit += 1;
    }
    table[i] = rem;
    i += 1;
  }
  table
};

/// A running CRC-32, fed one slice at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc32 {
  state: u32,
}
impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl Crc32 {
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { state: u32::MAX }
  }

  /// Feeds more bytes in.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
    self.state = bytes.iter().fold(self.state, |state, &b| {
      REMAINDERS[usize::from(state as u8 ^ b)] ^ (state >> 8)
    });
    self
  }

  /// The CRC of everything fed in so far.
  #[inline]
  #[must_use]
  pub const fn finish(&self) -> u32 {
    !self.state
  }
}

/// The CRC stored at the end of a chunk with type `ty` and body `data`.
#[inline]
#[must_use]
pub fn chunk_crc(ty: &[u8; 4], data: &[u8]) -> u32 {
  Crc32::new().update(ty).update(data).finish()
}
