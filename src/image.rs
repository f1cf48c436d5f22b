use crate::all::*;

// Row-major grayscale frame as supplied by the caller.
#[derive(Clone)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Image> {
    if width == 0 || height == 0 {
      bail!("Image dimensions must be positive, got {}x{}.", width, height);
    }
    if data.len() != width * height {
      bail!("Image data length {} does not match {}x{}.", data.len(), width, height);
    }
    Ok(Image { data, width, height })
  }

  pub fn empty() -> Image {
    Image {
      data: vec![],
      width: 0,
      height: 0,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }
}

// Element access in the manner of `image[y][x]`.
impl Index<usize> for Image {
  type Output = [u8];
  fn index(&self, y: usize) -> &Self::Output {
    &self.data[y * self.width .. (y + 1) * self.width]
  }
}

impl fmt::Display for Image {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = String::new();
    for y in 0..self.height {
      for x in 0..self.width {
        s += &format!("{:>3},", self.value(x, y));
      }
      s += "\n";
    }
    write!(f, "{}", s)
  }
}

// Floating point storage for pyramid levels and derivatives. The buffers are
// reshaped in place so that per-frame processing does not allocate.
#[derive(Clone, Debug, Default)]
pub struct ImageF32 {
  pub data: Vec<f32>,
  pub width: usize,
  pub height: usize,
}

impl ImageF32 {
  pub fn new(width: usize, height: usize) -> ImageF32 {
    ImageF32 {
      data: vec![0.; width * height],
      width,
      height,
    }
  }

  // Keeps the allocation if the capacity suffices.
  pub fn reshape(&mut self, width: usize, height: usize) {
    self.data.resize(width * height, 0.);
    self.width = width;
    self.height = height;
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> f32 {
    self.data[y * self.width + x]
  }

  // Out-of-range coordinates are clamped to the nearest border pixel.
  #[inline(always)]
  pub fn value_clamped(&self, x: i64, y: i64) -> f32 {
    let x = x.clamp(0, self.width as i64 - 1) as usize;
    let y = y.clamp(0, self.height as i64 - 1) as usize;
    self.value(x, y)
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: f32) {
    self.data[y * self.width + x] = value;
  }

  // True if every pixel of the square window of radius `r` around `center`
  // can be sampled with `bilinear()`. Coordinate (0, 0) is the center of the
  // top-left pixel.
  pub fn contains_window(&self, center: Vector2d, r: f64) -> bool {
    if self.width == 0 || self.height == 0 { return false }
    center[0] - r >= 0.
      && center[1] - r >= 0.
      && center[0] + r <= (self.width - 1) as f64
      && center[1] + r <= (self.height - 1) as f64
  }

  #[inline(always)]
  pub fn bilinear(&self, u: Vector2d) -> f64 {
    debug_assert!(u[0] >= 0.0 && u[0] <= self.width as f64 - 1.);
    debug_assert!(u[1] >= 0.0 && u[1] <= self.height as f64 - 1.);
    let x0 = u[0] as usize;
    let y0 = u[1] as usize;
    // Clamping allows sampling exactly on the right and bottom edges.
    let x1 = usize::min(x0 + 1, self.width - 1);
    let y1 = usize::min(y0 + 1, self.height - 1);
    let xa = u[0] - x0 as f64;
    let ya = u[1] - y0 as f64;
    (1. - xa) * (1. - ya) * self.value(x0, y0) as f64
      + xa * (1. - ya) * self.value(x1, y0) as f64
      + (1. - xa) * ya * self.value(x0, y1) as f64
      + xa * ya * self.value(x1, y1) as f64
  }
}

// Smooth texture with gradients in every direction, shifted by `shift`
// pixels. Used by tests across modules.
#[cfg(test)]
pub fn synthetic_texture(width: usize, height: usize, shift: Vector2d) -> Image {
  use std::f64::consts::PI;
  let mut data = vec![0; width * height];
  for y in 0..height {
    for x in 0..width {
      let u = x as f64 - shift[0];
      let v = y as f64 - shift[1];
      let value = 128.
        + 45. * (2. * PI * u / 40. + 0.3).sin()
        + 45. * (2. * PI * v / 34. + 1.1).sin()
        + 25. * (2. * PI * (u + v) / 52.).sin();
      data[y * width + x] = value.round().clamp(0., 255.) as u8;
    }
  }
  Image { data, width, height }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_validates_size() {
    assert!(Image::new(vec![0; 6], 3, 2).is_ok());
    assert!(Image::new(vec![0; 5], 3, 2).is_err());
    assert!(Image::new(vec![], 0, 0).is_err());
    assert!(Image::empty().is_empty());
  }

  #[test]
  fn test_index() {
    let image = Image::new(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
    assert_eq!(image[1][0], 4);
    assert_eq!(image.value(2, 0), 3);
    assert_eq!(format!("{}", image), "  1,  2,  3,\n  4,  5,  6,\n");
  }

  #[test]
  fn test_bilinear() {
    let image = ImageF32 {
      data: vec![
        0., 10.,
        20., 30.,
      ],
      width: 2,
      height: 2,
    };
    assert_eq!(image.bilinear(Vector2d::new(0., 0.)), 0.);
    assert_eq!(image.bilinear(Vector2d::new(1., 1.)), 30.);
    assert_eq!(image.bilinear(Vector2d::new(0.5, 0.)), 5.);
    assert_eq!(image.bilinear(Vector2d::new(0.5, 0.5)), 15.);
    assert_eq!(image.bilinear(Vector2d::new(1., 0.5)), 20.);
  }

  #[test]
  fn test_contains_window() {
    let image = ImageF32::new(10, 10);
    assert!(image.contains_window(Vector2d::new(4.5, 4.5), 3.));
    assert!(image.contains_window(Vector2d::new(3., 6.), 3.));
    assert!(!image.contains_window(Vector2d::new(2.9, 5.), 3.));
    assert!(!image.contains_window(Vector2d::new(5., 6.1), 3.));
  }

  #[test]
  fn test_reshape_keeps_allocation() {
    let mut image = ImageF32::new(8, 8);
    let capacity = image.data.capacity();
    image.reshape(4, 4);
    assert_eq!(image.data.len(), 16);
    image.reshape(8, 8);
    assert_eq!(image.data.capacity(), capacity);
  }

  #[test]
  fn test_value_clamped() {
    let mut image = ImageF32::new(3, 3);
    image.set_value(0, 0, 1.);
    image.set_value(2, 2, 2.);
    assert_eq!(image.value_clamped(-5, -1), 1.);
    assert_eq!(image.value_clamped(10, 3), 2.);
  }
}
