use crate::all::*;

// Pyramid of a single video frame together with per-level derivatives.
pub struct Frame {
  pub pyramid: Pyramid,
  deriv_x: Vec<ImageF32>,
  deriv_y: Vec<ImageF32>,
}

pub struct Level<'a> {
  pub image: &'a ImageF32,
  pub deriv_x: &'a ImageF32,
  pub deriv_y: &'a ImageF32,
}

impl Frame {
  pub fn empty() -> Frame {
    Frame {
      pyramid: Pyramid::empty(),
      deriv_x: vec![],
      deriv_y: vec![],
    }
  }

  pub fn new(
    image: &Image,
    level_count: usize,
    gradient: &dyn GradientOperator,
  ) -> Frame {
    let mut frame = Frame::empty();
    frame.allocate(image.width, image.height, level_count);
    frame.process(image, gradient);
    frame
  }

  pub fn allocate(&mut self, width: usize, height: usize, level_count: usize) {
    self.pyramid.allocate(width, height, level_count);
    let sizes: Vec<[usize; 2]> = (0..level_count).map(|i| self.pyramid.size(i)).collect();
    self.deriv_x = sizes.iter().map(|s| ImageF32::new(s[0], s[1])).collect();
    self.deriv_y = sizes.iter().map(|s| ImageF32::new(s[0], s[1])).collect();
  }

  pub fn process(&mut self, image: &Image, gradient: &dyn GradientOperator) {
    self.pyramid.process(image);
    for (i, level) in self.pyramid.levels.iter().enumerate() {
      gradient.process(level, &mut self.deriv_x[i], &mut self.deriv_y[i]);
    }
  }

  pub fn level_count(&self) -> usize {
    self.pyramid.level_count()
  }

  pub fn get_level(&self, level: usize) -> Level {
    Level {
      image: &self.pyramid.levels[level],
      deriv_x: &self.deriv_x[level],
      deriv_y: &self.deriv_y[level],
    }
  }
}
