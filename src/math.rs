use crate::all::*;

// Counter-clockwise rotation in image coordinates (x right, y down), which
// appears clockwise on screen.
#[inline(always)]
pub fn rotate(theta: f64, v: Vector2d) -> Vector2d {
  let (s, c) = theta.sin_cos();
  Vector2d::new(c * v[0] - s * v[1], s * v[0] + c * v[1])
}

#[inline(always)]
pub fn cross_2d(a: Vector2d, b: Vector2d) -> f64 {
  a[0] * b[1] - a[1] * b[0]
}
