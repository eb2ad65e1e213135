#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Decoding
//!
//! 1) [`parse_png_bytes`] (or [`parse_chunks`] for a file) checks the
//!    signature, splits the chunk stream, verifies every CRC, and reads the
//!    [`Ihdr`]. All of the `IDAT` data is joined into one buffer.
//! 2) That buffer is a zlib stream. Inflate it with any zlib decoder. With the
//!    `miniz_oxide` feature, [`inflate_zlib`] does this.
//! 3) The inflated bytes are *filtered* scanlines. [`PngData::decode_with`]
//!    takes the inflate step as a closure and does the unfiltering, giving an
//!    [`Image`].
//!
//! Or just call [`png_try_image`] with the `miniz_oxide` feature.
//!
//! ## Strictness
//!
//! Parsing stops at the first problem. Bad signatures, truncated chunks,
//! chunk types that aren't four ASCII letters, and CRC mismatches are all
//! errors, and nothing partial is returned. Only 8-bit RGBA non-interlaced
//! images are accepted, all other `IHDR` settings are rejected before any
//! other chunk is read.
//!
//! ## Filters and Interlacing
//!
//! The [`filter`] and [`defilter`] functions convert between an [`Image`] and
//! RGB scanlines using any single [`FilterType`]. The [`adam7_merge`] function
//! and [`Image::adam7_split`] method move between an image and its seven
//! Adam7 reduced images.

use crate::{util::*, FormatError, Image, ImagoResult, Pixel, RangeError};

mod adam7;
mod chunk;
mod crc32;
mod filter;
mod ihdr;
mod inflate;
mod reader;

pub use adam7::*;
pub use chunk::*;
pub use crc32::*;
pub use filter::*;
pub use ihdr::*;
pub use inflate::*;
pub use reader::*;

/// The first eight bytes of a PNG data stream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
