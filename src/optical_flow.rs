// Pyramidal Lucas-Kanade tracker based on:
// <http://robots.stanford.edu/cs223b04/algo_tracking.pdf>
// “Pyramidal Implementation of the Lucas Kanade Feature Tracker
//   Description of the algorithm” by Jean-Yves Bouguet
//
// The template window and its gradients are sampled once when the feature is
// described, so tracking only samples the target image.

use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackFault {
  Success,
  // The window left the image at the finest level.
  OutOfBounds,
  // Too little texture to solve for the flow.
  Degenerate,
  // Converged, but the window does not match the template.
  LargeError,
}

pub trait PointTracker {
  // Samples the appearance around `feature.position` from `frame`. Returns
  // false if the feature cannot be described at the finest level.
  fn set_description(&mut self, frame: &Frame, feature: &mut KltFeature) -> bool;

  // Searches `frame` for the described feature and on success moves
  // `feature.position` to the found location.
  fn track(&mut self, frame: &Frame, feature: &mut KltFeature) -> TrackFault;
}

#[derive(Clone, Debug)]
struct Window {
  values: Vec<f64>,
  grad_x: Vec<f64>,
  grad_y: Vec<f64>,
  // Spatial gradient matrix, normalized by the window pixel count.
  gradient_matrix: Matrix2d,
}

impl Default for Window {
  fn default() -> Self {
    Window {
      values: vec![],
      grad_x: vec![],
      grad_y: vec![],
      gradient_matrix: Matrix2d::zeros(),
    }
  }
}

#[derive(Clone, Debug)]
pub struct KltFeature {
  pub position: Vector2d,
  radius: usize,
  windows: Vec<Window>,
  // Number of finest levels with a valid description.
  described_levels: usize,
}

impl KltFeature {
  pub fn new(radius: usize) -> KltFeature {
    KltFeature {
      position: Vector2d::zeros(),
      radius,
      windows: vec![],
      described_levels: 0,
    }
  }

  pub fn radius(&self) -> usize {
    self.radius
  }

  pub fn described_levels(&self) -> usize {
    self.described_levels
  }

  fn pixel_count(&self) -> f64 {
    let side = 2 * self.radius + 1;
    (side * side) as f64
  }
}

pub struct KltTracker {
  iterations: usize,
  min_determinant: f64,
  min_delta: f64,
  max_pixel_error: f64,
}

impl KltTracker {
  pub fn new(p: &ParameterSet) -> KltTracker {
    KltTracker {
      iterations: p.lk_iters,
      min_determinant: p.lk_min_determinant,
      min_delta: p.lk_min_delta,
      max_pixel_error: p.lk_max_pixel_error,
    }
  }
}

impl PointTracker for KltTracker {
  fn set_description(&mut self, frame: &Frame, feature: &mut KltFeature) -> bool {
    let r = feature.radius as i32;
    let n = feature.pixel_count();
    if feature.windows.len() < frame.level_count() {
      feature.windows.resize_with(frame.level_count(), Window::default);
    }
    feature.described_levels = 0;
    for level_ind in 0..frame.level_count() {
      let level = frame.get_level(level_ind);
      let center = feature.position / level_scale(level_ind);
      if !level.image.contains_window(center, r as f64) { break }

      let window = &mut feature.windows[level_ind];
      window.values.clear();
      window.grad_x.clear();
      window.grad_y.clear();
      let mut x2 = 0.;
      let mut y2 = 0.;
      let mut xy = 0.;
      for y in -r..=r {
        for x in -r..=r {
          let u = center + Vector2d::new(x as f64, y as f64);
          let gx = level.deriv_x.bilinear(u);
          let gy = level.deriv_y.bilinear(u);
          window.values.push(level.image.bilinear(u));
          window.grad_x.push(gx);
          window.grad_y.push(gy);
          x2 += gx * gx;
          y2 += gy * gy;
          xy += gx * gy;
        }
      }
      window.gradient_matrix = Matrix2d::new(x2, xy, xy, y2) / n;
      feature.described_levels += 1;
    }
    feature.described_levels > 0
  }

  #[allow(non_snake_case)]
  fn track(&mut self, frame: &Frame, feature: &mut KltFeature) -> TrackFault {
    let levels = usize::min(feature.described_levels, frame.level_count());
    if levels == 0 { return TrackFault::OutOfBounds }
    let r = feature.radius;
    let n = feature.pixel_count();
    let min_delta2 = self.min_delta * self.min_delta;

    // Displacement guess in the coordinates of the level being processed.
    let mut g = Vector2d::zeros();
    for L in (0..levels).rev() {
      let level = frame.get_level(L);
      let window = &feature.windows[L];
      let u = feature.position / level_scale(L);
      let mut d = g;

      let G = window.gradient_matrix;
      let invG = if G.determinant() < self.min_determinant { None } else { G.try_inverse() };
      let invG = match invG {
        Some(invG) => invG,
        None if L == 0 => return TrackFault::Degenerate,
        None => {
          g = 2. * d;
          continue;
        },
      };

      for _ in 0..self.iterations {
        let center = u + d;
        if !level.image.contains_window(center, r as f64) {
          if L == 0 { return TrackFault::OutOfBounds }
          break;
        }
        let (b, _) = mismatch(level.image, window, center, r);
        let delta = -(invG * (b / n));
        d += delta;
        if delta.norm_squared() < min_delta2 { break }
      }
      g = if L > 0 { 2. * d } else { d };
    }

    let target = feature.position + g;
    let level = frame.get_level(0);
    if !level.image.contains_window(target, r as f64) {
      return TrackFault::OutOfBounds;
    }
    let (_, error) = mismatch(level.image, &feature.windows[0], target, r);
    if error / n > self.max_pixel_error {
      return TrackFault::LargeError;
    }
    feature.position = target;
    TrackFault::Success
  }
}

// Level `i` is downscaled by `2^i`.
#[inline(always)]
fn level_scale(level: usize) -> f64 {
  u32::pow(2, level as u32) as f64
}

// Sums the image difference weighted by the template gradient, and the
// absolute image difference, over the window centered at `center`.
fn mismatch(
  image: &ImageF32,
  window: &Window,
  center: Vector2d,
  r: usize,
) -> (Vector2d, f64) {
  let r = r as i32;
  let mut b = Vector2d::zeros();
  let mut error = 0.;
  let mut i = 0;
  for y in -r..=r {
    for x in -r..=r {
      let e = image.bilinear(center + Vector2d::new(x as f64, y as f64)) - window.values[i];
      b[0] += e * window.grad_x[i];
      b[1] += e * window.grad_y[i];
      error += e.abs();
      i += 1;
    }
  }
  (b, error)
}
