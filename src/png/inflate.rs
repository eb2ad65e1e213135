use super::*;

impl PngData {
  /// Turns the `IDAT` data into an image, using `inflate` to decompress it.
  ///
  /// The alpha channel is dropped. PNG stores rows top to bottom, so the
  /// rows are flipped to match this crate's bottom-up order.
  ///
  /// ## Failure
  /// * A zero width or height.
  /// * Whatever `inflate` fails with.
  /// * The inflated data is too short or has a bad filter type byte.
  pub fn decode_with<F>(&self, inflate: F) -> ImagoResult<Image>
  where
    F: FnOnce(&[u8]) -> ImagoResult<Vec<u8>>,
  {
    let width = self.ihdr.width as usize;
    let height = self.ihdr.height as usize;
    if width == 0 || height == 0 {
      return Err(RangeError::Dimensions { height, width }.into());
    }
    let bpp = self.ihdr.bytes_per_pixel();
    let row_bytes = width.checked_mul(bpp).ok_or(RangeError::Dimensions { height, width })?;
    let mut raw = inflate(&self.idat)?;
    unfilter_in_place(&mut raw, height, row_bytes, bpp)?;
    let pixels = raw
      .chunks_exact(row_bytes + 1)
      .take(height)
      .flat_map(|line| line[1..].chunks_exact(bpp).map(|rgba| Pixel::new(rgba[0], rgba[1], rgba[2])))
      .collect();
    let mut image = Image::from_pixels(pixels, height, width)?;
    image.reflect_vertical();
    log::debug!("png decoded: {width}x{height} from {} IDAT bytes", self.idat.len());
    Ok(image)
  }
}

/// Decompresses a zlib stream.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
pub fn inflate_zlib(bytes: &[u8]) -> ImagoResult<Vec<u8>> {
  miniz_oxide::inflate::decompress_to_vec_zlib(bytes).map_err(|e| {
    log::warn!("inflate failed: {e:?}");
    FormatError::Inflate.into()
  })
}

/// Decodes PNG bytes all the way to an image.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
pub fn png_try_image(bytes: &[u8]) -> ImagoResult<Image> {
  parse_png_bytes(bytes)?.decode_with(inflate_zlib)
}
