#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

//! An in-memory RGB raster, with codecs and spatial filters.
//!
//! * [`Image`] owns a `height * width` grid of [`Pixel`] values and has the
//!   per-pixel operations (grey scale, sepia, masks, reflections).
//! * The 3x3 kernel filters (blur, ridge, sharpen, emboss, and Sobel edges)
//!   and the Gaussian blur are also methods on [`Image`].
//! * [`bmp`] reads and writes uncompressed 24-bit Windows Bitmaps.
//! * [`png`] parses PNG chunk streams, and has the scanline filters and Adam7
//!   interlacing.
//!
//! Every fallible operation returns an [`ImagoResult`]. On failure nothing is
//! left half done: no partial image is returned and no partial file is
//! written.
//!
//! ## Row Order
//!
//! Row 0 of an [`Image`] is the first row stored in a BMP file, which for a
//! normal (bottom-up) BMP is the bottom of the picture. Decoding a top-down
//! BMP or a PNG flips the rows to match.
//!
//! ## Logging
//!
//! This crate emits diagnostics through the [`log`] facade. Nothing is printed
//! unless the application installs a logger.

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

mod util;

mod pixel;
pub use pixel::*;

mod image;
pub use image::*;

mod convolve;
pub use convolve::*;

mod gauss;
pub use gauss::*;

#[cfg(feature = "bmp")]
#[cfg_attr(docs_rs, doc(cfg(feature = "bmp")))]
pub mod bmp;

#[cfg(feature = "png")]
#[cfg_attr(docs_rs, doc(cfg(feature = "png")))]
pub mod png;
