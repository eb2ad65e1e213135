//! Just has shorthands for the byte parsing things you'd want to do.
#![allow(dead_code)]

use bytemuck::{pod_read_unaligned, Pod};
use core::mem::size_of;

use crate::FormatError;

#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(
  bytes: &[u8],
) -> Result<([u8; N], &[u8]), FormatError> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Ok((a, tail))
  } else {
    Err(FormatError::NotEnoughBytes { expected: N, actual: bytes.len() })
  }
}

#[inline]
pub(crate) fn try_pull_slice(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8]), FormatError> {
  if bytes.len() >= n {
    Ok(bytes.split_at(n))
  } else {
    Err(FormatError::NotEnoughBytes { expected: n, actual: bytes.len() })
  }
}

#[inline]
pub(crate) fn try_pull_pod<T: Pod>(bytes: &[u8]) -> Result<(T, &[u8]), FormatError> {
  let position = size_of::<T>();
  if bytes.len() >= position {
    let (head, tail) = bytes.split_at(position);
    let a: T = pod_read_unaligned(head);
    Ok((a, tail))
  } else {
    Err(FormatError::NotEnoughBytes { expected: position, actual: bytes.len() })
  }
}

#[inline]
#[must_use]
pub(crate) const fn u32_be(a: [u8; 4]) -> u32 {
  u32::from_be_bytes(a)
}
