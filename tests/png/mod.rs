use imago::{
  png::{
    chunk_crc, defilter, filter_rows, parse_png_bytes, ChunkType, FilterType, RawChunkIter,
    PNG_SIGNATURE,
  },
  FormatError, Image, ImagoError, Pixel,
};
use walkdir::WalkDir;

fn chunk(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
  let mut out = (data.len() as u32).to_be_bytes().to_vec();
  out.extend_from_slice(ty);
  out.extend_from_slice(data);
  out.extend_from_slice(&chunk_crc(ty, data).to_be_bytes());
  out
}

/// Builds a real RGBA PNG, top row first, every row using `ty`.
fn rgba_png(width: u32, height: u32, rgba: &[u8], ty: FilterType) -> Vec<u8> {
  let mut ihdr = width.to_be_bytes().to_vec();
  ihdr.extend_from_slice(&height.to_be_bytes());
  ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
  let lines = filter_rows(rgba, height as usize, width as usize * 4, 4, ty);
  let packed = miniz_oxide::deflate::compress_to_vec_zlib(&lines, 6);
  let (a, b) = packed.split_at(packed.len() / 2);
  let mut out = PNG_SIGNATURE.to_vec();
  out.extend(chunk(b"IHDR", &ihdr));
  out.extend(chunk(b"IDAT", a));
  out.extend(chunk(b"tEXt", b"Comment\0test"));
  out.extend(chunk(b"IDAT", b));
  out.extend(chunk(b"IEND", &[]));
  out
}

#[test]
fn test_RawChunkIter_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    for _ in RawChunkIter::new(&v) {
      //
    }
    let _ = parse_png_bytes(&v);
  }
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for _ in RawChunkIter::new(&v) {
      //
    }
    let mut signed = PNG_SIGNATURE.to_vec();
    signed.extend(v);
    let _ = parse_png_bytes(&signed);
  }
}

#[test]
fn test_parse_real_stream() {
  let rgba: Vec<u8> = (0..3 * 2 * 4).map(|i| i as u8).collect();
  let bytes = rgba_png(3, 2, &rgba, FilterType::Sub);
  let data = parse_png_bytes(&bytes).unwrap();
  assert_eq!((data.ihdr.width, data.ihdr.height), (3, 2));
  assert_eq!(data.chunks.len(), 5);
  assert_eq!(data.chunks[2].ty, ChunkType(*b"tEXt"));
  assert!(data.chunks.iter().all(|c| c.length as usize == c.data.len()));
  let lines = miniz_oxide::inflate::decompress_to_vec_zlib(&data.idat).unwrap();
  assert_eq!(lines.len(), 2 * (1 + 3 * 4));
}

#[test]
fn test_any_flipped_bit_is_caught() {
  let rgba = super::rand_bytes(4 * 4 * 4);
  let bytes = rgba_png(4, 4, &rgba, FilterType::Paeth);
  // every byte after the signature is covered by a length, type, or crc check
  for i in (8..bytes.len()).step_by(7) {
    let mut bad = bytes.clone();
    bad[i] ^= 0b0000_0100;
    assert!(parse_png_bytes(&bad).is_err(), "flipped byte {i} was accepted");
  }
}

#[test]
#[cfg(feature = "miniz_oxide")]
fn test_png_try_image() {
  use imago::png::png_try_image;
  let (w, h) = (5_usize, 3_usize);
  let mut rgba = Vec::new();
  for y in 0..h {
    for x in 0..w {
      rgba.extend_from_slice(&[(x * 40) as u8, (y * 90) as u8, (x + y) as u8, 255]);
    }
  }
  for ty in FilterType::ALL {
    let img = png_try_image(&rgba_png(w as u32, h as u32, &rgba, ty)).unwrap();
    assert_eq!((img.height(), img.width()), (h, w));
    // the top row of the png is the last row of the image
    assert_eq!(img.get(h - 1, 0).unwrap(), Pixel::new(0, 0, 0));
    assert_eq!(img.get(0, 4).unwrap(), Pixel::new(160, 180, 6));
  }
}

#[test]
#[cfg(feature = "miniz_oxide")]
fn test_png_try_image_bad_zlib() {
  use imago::png::png_try_image;
  let mut ihdr = 1_u32.to_be_bytes().to_vec();
  ihdr.extend_from_slice(&1_u32.to_be_bytes());
  ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
  let mut bytes = PNG_SIGNATURE.to_vec();
  bytes.extend(chunk(b"IHDR", &ihdr));
  bytes.extend(chunk(b"IDAT", &[1, 2, 3, 4]));
  bytes.extend(chunk(b"IEND", &[]));
  assert!(matches!(png_try_image(&bytes), Err(ImagoError::Format(FormatError::Inflate))));
}

#[test]
fn test_defilter_after_inflate() {
  // the inflated scanlines of an RGB image go straight into defilter
  let img = super::sample_image(4, 3);
  let packed = miniz_oxide::deflate::compress_to_vec_zlib(&img.to_scanlines(FilterType::Up), 6);
  let lines = miniz_oxide::inflate::decompress_to_vec_zlib(&packed).unwrap();
  let back: Image = defilter(&lines, 4, 3).unwrap();
  assert_eq!(back, img);
}
