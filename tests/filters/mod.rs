use imago::{
  make_gauss_kernel,
  png::{adam7_merge, defilter, filter, FilterType},
  Image, ImagoError, Kernel3x3, Normalization, Pixel, RangeError,
};

#[test]
fn test_filter_defilter_identity() {
  for (h, w) in [(1, 1), (1, 4), (5, 1), (3, 3), (4, 6), (7, 2)] {
    let img = super::sample_image(h, w);
    for ty in FilterType::ALL {
      let lines = filter(&img, ty);
      let again = filter(&defilter(&lines, h, w).unwrap(), ty);
      assert_eq!(again, lines, "{h}x{w} {ty:?}");
    }
  }
}

#[test]
fn test_defilter_random_data_never_panics() {
  for _ in 0..20 {
    let mut v = super::rand_bytes(3 * (1 + 3 * 5));
    for line in v.chunks_exact_mut(16) {
      line[0] %= 5;
    }
    assert!(defilter(&v, 3, 5).is_ok());
    let _ = defilter(&super::rand_bytes(48), 3, 5);
  }
}

#[test]
fn test_adam7_known_8x8() {
  let img = super::sample_image(8, 8);
  let passes = img.adam7_split().unwrap();
  assert_eq!(adam7_merge(&passes, 8, 8).unwrap(), img);
  let first = adam7_merge(&passes[..1], 8, 8).unwrap();
  assert_eq!(first.get(7, 7).unwrap(), img.get(0, 0).unwrap());
}

#[test]
fn test_blur_one_pixel() {
  let mut img = Image::from_pixels(vec![Pixel::new(9, 99, 199)], 1, 1).unwrap();
  img.blur().unwrap();
  assert_eq!(img.get(0, 0).unwrap(), Pixel::new(9, 99, 199));
}

#[test]
fn test_flat_image_survives_edges() {
  let flat = Image::from_pixels(vec![Pixel::new(12, 12, 12); 30], 5, 6).unwrap();
  let mut img = flat.clone();
  img.edges();
  assert_eq!(img, flat);
}

#[test]
fn test_custom_kernel() {
  // identity kernel leaves every image alone
  let identity = Kernel3x3([0, 0, 0, 0, 1, 0, 0, 0, 0]);
  let mut img = super::sample_image(4, 5);
  let before = img.clone();
  img.apply_kernel_3x3(identity, Normalization::None).unwrap();
  assert_eq!(img, before);
}

#[test]
fn test_gaussian_blur_errors_and_kernel() {
  let mut img = super::sample_image(3, 3);
  let before = img.clone();
  assert!(matches!(img.gaussian_blur(0.0), Err(ImagoError::Range(RangeError::Sigma(_)))));
  assert!(matches!(img.gaussian_blur(f64::INFINITY), Err(ImagoError::Range(RangeError::Sigma(_)))));
  assert_eq!(img, before);
  assert_eq!(make_gauss_kernel(2.0).unwrap().radius(), 6);
}

#[test]
fn test_pipeline_keeps_dimensions() {
  let mut img = super::sample_image(9, 7);
  img.grey_scale();
  img.sharpen().unwrap();
  img.gaussian_blur(0.8).unwrap();
  img.edges();
  img.emboss().unwrap();
  img.ridge().unwrap();
  img.sepia();
  img.color_mask(0.5, 1.0, 0.25);
  img.reflect_vertical();
  assert_eq!((img.height(), img.width(), img.len()), (9, 7, 63));
}
