//! Module for the pixel data structures.

use bytemuck::{Pod, Zeroable};

/// Red/Green/Blue, u8 per channel.
///
/// There's no color space attached, the bytes are just bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroable, Pod)]
#[repr(C)]
#[allow(missing_docs)]
pub struct Pixel {
  pub red: u8,
  pub green: u8,
  pub blue: u8,
}
impl Pixel {
  /// The all-zero pixel, used for any neighbor that's off the image.
  pub const BLACK: Self = Self { red: 0, green: 0, blue: 0 };

  #[inline]
  #[must_use]
  pub const fn new(red: u8, green: u8, blue: u8) -> Self {
    Self { red, green, blue }
  }

  /// Sets all three channels to the same value.
  #[inline]
  #[must_use]
  pub const fn splat(v: u8) -> Self {
    Self { red: v, green: v, blue: v }
  }

  #[inline]
  #[must_use]
  pub const fn to_array(self) -> [u8; 3] {
    [self.red, self.green, self.blue]
  }
}
impl From<[u8; 3]> for Pixel {
  #[inline]
  fn from([red, green, blue]: [u8; 3]) -> Self {
    Self { red, green, blue }
  }
}
impl From<Pixel> for [u8; 3] {
  #[inline]
  fn from(p: Pixel) -> Self {
    p.to_array()
  }
}

/// Red/Green/Blue, f64 per channel.
///
/// Kernel sums are built up in this type and only turned back into a [`Pixel`]
/// at the very end of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[allow(missing_docs)]
pub struct PixelAccumulator {
  pub red: f64,
  pub green: f64,
  pub blue: f64,
}
impl PixelAccumulator {
  #[inline]
  #[must_use]
  pub const fn new(red: f64, green: f64, blue: f64) -> Self {
    Self { red, green, blue }
  }

  /// Adds `weight * p` to each channel.
  #[inline]
  pub fn add_weighted(&mut self, p: Pixel, weight: f64) {
    self.red += weight * f64::from(p.red);
    self.green += weight * f64::from(p.green);
    self.blue += weight * f64::from(p.blue);
  }

  /// Divides each channel by `d`.
  #[inline]
  #[must_use]
  pub fn div(self, d: f64) -> Self {
    Self { red: self.red / d, green: self.green / d, blue: self.blue / d }
  }

  /// Clamps each channel to `0.0..=255.0` and rounds to the nearest integer.
  #[inline]
  #[must_use]
  pub fn to_pixel(self) -> Pixel {
    Pixel {
      red: clamp_round(self.red),
      green: clamp_round(self.green),
      blue: clamp_round(self.blue),
    }
  }
}
impl From<Pixel> for PixelAccumulator {
  #[inline]
  fn from(p: Pixel) -> Self {
    Self { red: f64::from(p.red), green: f64::from(p.green), blue: f64::from(p.blue) }
  }
}
impl From<PixelAccumulator> for Pixel {
  #[inline]
  fn from(acc: PixelAccumulator) -> Self {
    acc.to_pixel()
  }
}

/// Clamps to the `u8` range, then drops the fraction.
#[inline]
#[must_use]
pub(crate) fn clamp_truncate(v: f64) -> u8 {
  // `as` on a NaN gives 0, which is as good an answer as any.
  v.clamp(0.0, 255.0) as u8
}

/// Clamps to the `u8` range, adding `0.5` first so that truncation rounds.
#[inline]
#[must_use]
pub(crate) fn clamp_round(v: f64) -> u8 {
  clamp_truncate(v + 0.5)
}

#[test]
fn test_accumulator_rounds_and_clamps() {
  assert_eq!(PixelAccumulator::new(-3.0, 254.6, 900.0).to_pixel(), Pixel::new(0, 255, 255));
  assert_eq!(PixelAccumulator::new(1.49, 1.5, 127.2).to_pixel(), Pixel::new(1, 2, 127));
  let mut acc = PixelAccumulator::default();
  acc.add_weighted(Pixel::new(10, 20, 30), 2.0);
  acc.add_weighted(Pixel::new(1, 1, 1), -1.0);
  assert_eq!(acc, PixelAccumulator::new(19.0, 39.0, 59.0));
  assert_eq!(Pixel::from(acc.div(2.0)), Pixel::new(10, 20, 30));
}
