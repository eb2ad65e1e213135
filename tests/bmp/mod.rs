use imago::{
  bmp::{bmp_decode, bmp_encode, decode, encode},
  ImagoError, Pixel,
};
use walkdir::WalkDir;

#[test]
fn test_bmps_do_not_panic_decoder() {
  // iter ALL files in the test folder, even non-bmp files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    if entry.file_type().is_dir() {
      continue;
    }
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let _ = bmp_decode(&v);
  }
  for _ in 0..10 {
    let _ = bmp_decode(&super::rand_bytes(1024));
  }
  // random data behind a real header
  let header = bmp_encode(&super::sample_image(3, 3)).unwrap();
  for _ in 0..10 {
    let mut v = header[..54].to_vec();
    v.extend(super::rand_bytes(40));
    let _ = bmp_decode(&v);
  }
}

#[test]
fn test_file_round_trip() {
  let dir = std::env::temp_dir();
  for (h, w) in [(1, 1), (2, 5), (7, 3), (4, 4)] {
    let img = super::sample_image(h, w);
    let path = dir.join(format!("imago_round_trip_{}_{h}x{w}.bmp", std::process::id()));
    encode(&img, &path).unwrap();
    assert!(!path.with_extension("bmp.tmp").exists());
    let back = decode(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(back.pixels(), img.pixels(), "{h}x{w}");
    assert_eq!((back.height(), back.width()), (h, w));
  }
}

#[test]
fn test_decode_missing_file_is_io_error() {
  let path = std::env::temp_dir().join("imago_this_file_does_not_exist.bmp");
  assert!(matches!(decode(path), Err(ImagoError::Io(_))));
}

#[test]
fn test_failed_encode_leaves_no_file() {
  let dir = std::env::temp_dir().join(format!("imago_no_such_dir_{}", std::process::id()));
  let path = dir.join("out.bmp");
  assert!(matches!(encode(&super::sample_image(2, 2), &path), Err(ImagoError::Io(_))));
  assert!(!path.exists());
}

#[test]
fn test_edit_then_save() {
  let mut img = super::sample_image(6, 5);
  img.black_out_part(1, 3, 0, 2).unwrap();
  img.reflect_horizontal();
  let back = bmp_decode(&bmp_encode(&img).unwrap()).unwrap();
  assert_eq!(back, img);
  assert_eq!(back.get(2, 4).unwrap(), Pixel::BLACK);
}
