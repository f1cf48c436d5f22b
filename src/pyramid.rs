use crate::all::*;

// Smallest level side, in feature window widths, for the automatic level
// count.
const MIN_LEVEL_WINDOWS: usize = 5;

// Level 0 is a float copy of the input. Every further level is the previous
// one smoothed with a [1 2 1]/4 kernel and subsampled at even pixels, so
// level `i` coordinates are level 0 coordinates divided by `2^i`.
pub struct Pyramid {
  pub levels: Vec<ImageF32>,
  // Horizontally smoothed parent level.
  workspace: ImageF32,
}

impl Pyramid {
  pub fn empty() -> Pyramid {
    Pyramid {
      levels: vec![],
      workspace: ImageF32::default(),
    }
  }

  pub fn new(width: usize, height: usize, level_count: usize) -> Pyramid {
    let mut pyramid = Pyramid::empty();
    pyramid.allocate(width, height, level_count);
    pyramid
  }

  pub fn allocate(&mut self, width: usize, height: usize, level_count: usize) {
    assert!(level_count > 0);
    self.levels = (0..level_count)
      .map(|level| {
        let size = level_size(width, height, level);
        ImageF32::new(size[0], size[1])
      })
      .collect();
    self.workspace = ImageF32::new(width, height);
  }

  pub fn level_count(&self) -> usize {
    self.levels.len()
  }

  pub fn width(&self) -> usize {
    self.levels.first().map(|x| x.width).unwrap_or(0)
  }

  pub fn height(&self) -> usize {
    self.levels.first().map(|x| x.height).unwrap_or(0)
  }

  pub fn size(&self, level: usize) -> [usize; 2] {
    [self.levels[level].width, self.levels[level].height]
  }

  pub fn process(&mut self, image: &Image) {
    assert_eq!(image.width, self.width());
    assert_eq!(image.height, self.height());
    for (dst, src) in self.levels[0].data.iter_mut().zip(image.data.iter()) {
      *dst = *src as f32;
    }
    for level in 1..self.levels.len() {
      let (parents, children) = self.levels.split_at_mut(level);
      smooth_horizontal(&parents[level - 1], &mut self.workspace);
      subsample_vertical(&self.workspace, &mut children[0]);
    }
  }
}

pub fn level_size(width: usize, height: usize, level: usize) -> [usize; 2] {
  [width >> level, height >> level]
}

// Number of levels whose smaller side fits `MIN_LEVEL_WINDOWS` feature
// windows. Always at least one.
pub fn select_level_count(width: usize, height: usize, feature_radius: usize) -> usize {
  let min_size = (2 * feature_radius + 1) * MIN_LEVEL_WINDOWS;
  let mut count = 1;
  loop {
    let size = level_size(width, height, count);
    if usize::min(size[0], size[1]) < min_size { break }
    count += 1;
  }
  count
}

// Caps a requested level count so that every level still holds one window.
pub fn clamp_level_count(
  width: usize,
  height: usize,
  feature_radius: usize,
  level_count: usize,
) -> usize {
  let window = 2 * feature_radius + 1;
  let mut count = 1;
  while count < level_count {
    let size = level_size(width, height, count);
    if usize::min(size[0], size[1]) < window { break }
    count += 1;
  }
  count
}

fn smooth_horizontal(src: &ImageF32, dst: &mut ImageF32) {
  dst.reshape(src.width, src.height);
  for y in 0..src.height {
    for x in 0..src.width {
      let x = x as i64;
      let y = y as i64;
      let v = 0.25 * src.value_clamped(x - 1, y)
        + 0.5 * src.value_clamped(x, y)
        + 0.25 * src.value_clamped(x + 1, y);
      dst.set_value(x as usize, y as usize, v);
    }
  }
}

fn subsample_vertical(src: &ImageF32, dst: &mut ImageF32) {
  for y in 0..dst.height {
    for x in 0..dst.width {
      let sx = 2 * x as i64;
      let sy = 2 * y as i64;
      let v = 0.25 * src.value_clamped(sx, sy - 1)
        + 0.5 * src.value_clamped(sx, sy)
        + 0.25 * src.value_clamped(sx, sy + 1);
      dst.set_value(x, y, v);
    }
  }
}
