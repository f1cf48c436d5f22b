use crate::all::*;

// Least squares samples need some slack over the two pairs that determine a
// similarity exactly.
const MIN_SAMPLE_PAIRS: usize = 3;
const MIN_SPREAD: f64 = 1e-12;

// Maps previous frame points to current frame points as
// `p1 = scale * R(theta) * p0 + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityTransform {
  pub scale: f64,
  pub theta: f64,
  pub translation: Vector2d,
}

impl SimilarityTransform {
  pub fn identity() -> SimilarityTransform {
    SimilarityTransform {
      scale: 1.,
      theta: 0.,
      translation: Vector2d::zeros(),
    }
  }

  pub fn apply(&self, p: Vector2d) -> Vector2d {
    self.scale * rotate(self.theta, p) + self.translation
  }
}

// Closed form least squares fit on centered coordinates.
pub fn fit_similarity(pairs: &[AssociatedPair]) -> Option<SimilarityTransform> {
  if pairs.len() < 2 { return None }
  let n = pairs.len() as f64;
  let mean0 = pairs.iter().fold(Vector2d::zeros(), |acc, x| acc + x.p0) / n;
  let mean1 = pairs.iter().fold(Vector2d::zeros(), |acc, x| acc + x.p1) / n;
  let mut spread = 0.;
  let mut dot = 0.;
  let mut cross = 0.;
  for pair in pairs {
    let a = pair.p0 - mean0;
    let b = pair.p1 - mean1;
    spread += a.norm_squared();
    dot += a.dot(&b);
    cross += cross_2d(a, b);
  }
  if spread < MIN_SPREAD { return None }
  let scale = f64::hypot(dot, cross) / spread;
  if !scale.is_finite() || scale <= 0. { return None }
  let theta = f64::atan2(cross, dot);
  let translation = mean1 - scale * rotate(theta, mean0);
  Some(SimilarityTransform { scale, theta, translation })
}

pub struct SimilarityGenerator;

impl ModelGenerator for SimilarityGenerator {
  type Model = SimilarityTransform;

  fn min_points(&self) -> usize {
    MIN_SAMPLE_PAIRS
  }

  fn generate(&self, sample: &[AssociatedPair]) -> Option<SimilarityTransform> {
    fit_similarity(sample)
  }
}

// Squared distance between the transformed previous point and the current
// point.
pub struct SimilarityDistanceSq;

impl ModelDistance for SimilarityDistanceSq {
  type Model = SimilarityTransform;

  fn distance(&self, model: &SimilarityTransform, pair: &AssociatedPair) -> f64 {
    (model.apply(pair.p0) - pair.p1).norm_squared()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(model: &SimilarityTransform, points: &[[f64; 2]]) -> Vec<AssociatedPair> {
    points.iter()
      .map(|p| {
        let p0 = Vector2d::new(p[0], p[1]);
        AssociatedPair { p0, p1: model.apply(p0) }
      })
      .collect()
  }

  #[test]
  fn test_fit_recovers_model() {
    let model = SimilarityTransform {
      scale: 1.3,
      theta: -0.4,
      translation: Vector2d::new(5., -7.),
    };
    let pairs = pairs(&model, &[[0., 0.], [10., 3.], [-4., 8.], [6., -2.]]);
    let fit = fit_similarity(&pairs).unwrap();
    assert!((fit.scale - model.scale).abs() < 1e-9);
    assert!((fit.theta - model.theta).abs() < 1e-9);
    assert!((fit.translation - model.translation).norm() < 1e-9);
  }

  #[test]
  fn test_fit_identity() {
    let pairs = pairs(&SimilarityTransform::identity(), &[[1., 1.], [4., 2.], [3., 7.]]);
    let fit = fit_similarity(&pairs).unwrap();
    assert!((fit.scale - 1.).abs() < 1e-12);
    assert_eq!(fit.theta, 0.);
    assert!(fit.translation.norm() < 1e-12);
  }

  #[test]
  fn test_coincident_points_fail() {
    let p = Vector2d::new(3., 4.);
    let pairs = vec![AssociatedPair { p0: p, p1: p + Vector2d::new(1., 0.) }; 3];
    assert!(fit_similarity(&pairs).is_none());
    assert!(fit_similarity(&pairs[..1]).is_none());
    assert!(SimilarityGenerator.generate(&pairs).is_none());
  }

  #[test]
  fn test_distance() {
    let model = SimilarityTransform {
      scale: 2.,
      theta: 0.,
      translation: Vector2d::new(1., 0.),
    };
    let pair = AssociatedPair { p0: Vector2d::new(1., 1.), p1: Vector2d::new(3., 5.) };
    assert_eq!(SimilarityDistanceSq.distance(&model, &pair), 9.);
  }
}
