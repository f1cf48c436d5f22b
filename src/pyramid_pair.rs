use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
  Previous,
  Current,
}

// Two frame slots whose roles are exchanged after every successful update.
// Only the role index moves, the buffers stay where they were allocated.
pub struct PyramidPair {
  frames: [Frame; 2],
  current: usize,
}

impl PyramidPair {
  pub fn new() -> PyramidPair {
    PyramidPair {
      frames: [Frame::empty(), Frame::empty()],
      current: 0,
    }
  }

  pub fn initialize(&mut self, width: usize, height: usize, level_count: usize) {
    for frame in &mut self.frames {
      frame.allocate(width, height, level_count);
    }
    self.current = 0;
  }

  pub fn is_initialized(&self) -> bool {
    self.frames[0].level_count() > 0
  }

  pub fn matches(&self, width: usize, height: usize) -> bool {
    let pyramid = &self.frames[0].pyramid;
    self.is_initialized() && pyramid.width() == width && pyramid.height() == height
  }

  pub fn level_count(&self) -> usize {
    self.frames[0].level_count()
  }

  pub fn process(&mut self, image: &Image, role: Role, gradient: &dyn GradientOperator) {
    let ind = self.index(role);
    self.frames[ind].process(image, gradient);
  }

  pub fn swap_roles(&mut self) {
    self.current = 1 - self.current;
  }

  pub fn get(&self, role: Role) -> &Frame {
    &self.frames[self.index(role)]
  }

  // Returns `(previous, current)`.
  pub fn frames(&self) -> (&Frame, &Frame) {
    (self.get(Role::Previous), self.get(Role::Current))
  }

  fn index(&self, role: Role) -> usize {
    match role {
      Role::Current => self.current,
      Role::Previous => 1 - self.current,
    }
  }
}

impl Default for PyramidPair {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn level0_ptr(pair: &PyramidPair, role: Role) -> *const f32 {
    pair.get(role).pyramid.levels[0].data.as_ptr()
  }

  #[test]
  fn test_initialize() {
    let mut pair = PyramidPair::new();
    assert!(!pair.is_initialized());
    assert!(!pair.matches(40, 30));
    pair.initialize(40, 30, 2);
    assert!(pair.is_initialized());
    assert!(pair.matches(40, 30));
    assert!(!pair.matches(30, 40));
    assert_eq!(pair.level_count(), 2);
    let (previous, current) = pair.frames();
    assert_eq!(previous.pyramid.size(1), current.pyramid.size(1));
  }

  #[test]
  fn test_swap_roles_exchanges_buffers() {
    let mut pair = PyramidPair::new();
    pair.initialize(32, 32, 2);
    let previous = level0_ptr(&pair, Role::Previous);
    let current = level0_ptr(&pair, Role::Current);
    assert_ne!(previous, current);
    pair.swap_roles();
    assert_eq!(level0_ptr(&pair, Role::Previous), current);
    assert_eq!(level0_ptr(&pair, Role::Current), previous);
    pair.swap_roles();
    assert_eq!(level0_ptr(&pair, Role::Previous), previous);
  }

  #[test]
  fn test_process_targets_role() {
    let mut pair = PyramidPair::new();
    pair.initialize(8, 8, 1);
    let dark = Image::new(vec![10; 64], 8, 8).unwrap();
    let bright = Image::new(vec![200; 64], 8, 8).unwrap();
    pair.process(&dark, Role::Previous, &Scharr);
    pair.process(&bright, Role::Current, &Scharr);
    assert_eq!(pair.get(Role::Previous).pyramid.levels[0].value(3, 3), 10.);
    assert_eq!(pair.get(Role::Current).pyramid.levels[0].value(3, 3), 200.);
    pair.swap_roles();
    assert_eq!(pair.get(Role::Previous).pyramid.levels[0].value(3, 3), 200.);
    // The new current slot holds stale data until it is processed again.
    pair.process(&dark, Role::Current, &Scharr);
    assert_eq!(pair.get(Role::Current).pyramid.levels[0].value(3, 3), 10.);
    assert_eq!(pair.get(Role::Previous).pyramid.levels[0].value(3, 3), 200.);
  }
}
