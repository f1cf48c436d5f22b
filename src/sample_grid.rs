use crate::all::*;

// Fills `samples` with an `n` by `n` grid spanning the whole rectangle,
// borders included, row by row.
pub fn sample_grid(region: &RotatedRectangle, n: usize, samples: &mut Vec<Vector2d>) {
  assert!(n >= 2);
  samples.clear();
  let p = 1. / (n - 1) as f64;
  for i in 0..n {
    let y = p * i as f64 - 0.5;
    for j in 0..n {
      let x = p * j as f64 - 0.5;
      samples.push(region.local_to_image(Vector2d::new(x, y)));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_close(a: Vector2d, b: [f64; 2]) {
    assert!((a - Vector2d::new(b[0], b[1])).norm() < 1e-9, "{:?} != {:?}", a, b);
  }

  #[test]
  fn test_axis_aligned() {
    let region = RotatedRectangle::new(50., 50., 20., 10., 0.).unwrap();
    let mut samples = vec![];
    sample_grid(&region, 3, &mut samples);
    assert_eq!(samples.len(), 9);
    assert_close(samples[0], [40., 45.]);
    assert_close(samples[1], [50., 45.]);
    assert_close(samples[2], [60., 45.]);
    assert_close(samples[4], [50., 50.]);
    assert_close(samples[8], [60., 55.]);
  }

  #[test]
  fn test_rotated() {
    let region = RotatedRectangle::new(0., 0., 4., 2., std::f64::consts::FRAC_PI_2).unwrap();
    let mut samples = vec![];
    sample_grid(&region, 2, &mut samples);
    // Local (-2, -1), (2, -1), (-2, 1), (2, 1) rotated by 90 degrees.
    assert_close(samples[0], [1., -2.]);
    assert_close(samples[1], [1., 2.]);
    assert_close(samples[2], [-1., -2.]);
    assert_close(samples[3], [-1., 2.]);
  }

  #[test]
  fn test_deterministic_and_cleared() {
    let region = RotatedRectangle::new(12.3, 45.6, 7.8, 9.1, 0.7).unwrap();
    let mut a = vec![Vector2d::zeros(); 3];
    let mut b = vec![];
    sample_grid(&region, 15, &mut a);
    sample_grid(&region, 15, &mut b);
    assert_eq!(a.len(), 225);
    assert_eq!(a, b);
  }
}
