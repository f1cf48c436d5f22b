use crate::all::*;

// Turns correspondences into a region update, or a reason to give up.
pub struct MotionEstimator<E> {
  estimator: E,
  min_correspondences: usize,
  max_fit_error: f64,
}

impl<E: RobustEstimator<Model = SimilarityTransform>> MotionEstimator<E> {
  pub fn new(estimator: E, min_correspondences: usize, max_fit_error: f64) -> MotionEstimator<E> {
    MotionEstimator {
      estimator,
      min_correspondences,
      max_fit_error,
    }
  }

  // `region` is only modified on success.
  pub fn estimate(
    &mut self,
    pairs: &[AssociatedPair],
    region: &mut RotatedRectangle,
  ) -> Result<SimilarityTransform, TrackFailure> {
    if pairs.len() < self.min_correspondences {
      return Err(TrackFailure::InsufficientCorrespondences {
        found: pairs.len(),
        required: self.min_correspondences,
      });
    }
    let fit = self.estimator.estimate(pairs).ok_or(TrackFailure::ModelFitFailed)?;
    if fit.error > self.max_fit_error {
      return Err(TrackFailure::FitQualityTooLow {
        error: fit.error,
        max_error: self.max_fit_error,
      });
    }
    region.apply(&fit.model);
    Ok(fit.model)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Returns a fixed result regardless of the input.
  struct FixedEstimator(Option<Fit<SimilarityTransform>>);

  impl RobustEstimator for FixedEstimator {
    type Model = SimilarityTransform;

    fn estimate(&mut self, _pairs: &[AssociatedPair]) -> Option<Fit<SimilarityTransform>> {
      self.0
    }
  }

  fn region() -> RotatedRectangle {
    RotatedRectangle::new(50., 50., 20., 10., 0.).unwrap()
  }

  fn pairs(n: usize) -> Vec<AssociatedPair> {
    (0..n).map(|i| {
      let p = Vector2d::new(i as f64, 0.);
      AssociatedPair { p0: p, p1: p }
    }).collect()
  }

  fn shift_fit(error: f64) -> Option<Fit<SimilarityTransform>> {
    Some(Fit {
      model: SimilarityTransform {
        scale: 1.5,
        theta: 0.,
        translation: Vector2d::new(-20., -25.),
      },
      error,
    })
  }

  #[test]
  fn test_insufficient_correspondences() {
    let mut motion = MotionEstimator::new(FixedEstimator(shift_fit(0.)), 4, 1.);
    let mut r = region();
    assert_eq!(
      motion.estimate(&pairs(3), &mut r),
      Err(TrackFailure::InsufficientCorrespondences { found: 3, required: 4 }),
    );
    assert_eq!(r, region());
  }

  #[test]
  fn test_model_fit_failed() {
    let mut motion = MotionEstimator::new(FixedEstimator(None), 1, 1.);
    let mut r = region();
    assert_eq!(motion.estimate(&pairs(5), &mut r), Err(TrackFailure::ModelFitFailed));
    assert_eq!(r, region());
  }

  #[test]
  fn test_fit_quality_too_low() {
    let mut motion = MotionEstimator::new(FixedEstimator(shift_fit(2.)), 1, 1.);
    let mut r = region();
    assert_eq!(
      motion.estimate(&pairs(5), &mut r),
      Err(TrackFailure::FitQualityTooLow { error: 2., max_error: 1. }),
    );
    assert_eq!(r, region());
  }

  #[test]
  fn test_applies_model() {
    let mut motion = MotionEstimator::new(FixedEstimator(shift_fit(1.)), 5, 1.);
    let mut r = region();
    let model = motion.estimate(&pairs(5), &mut r).unwrap();
    assert_eq!(model.scale, 1.5);
    assert_eq!(r, RotatedRectangle { cx: 55., cy: 50., width: 30., height: 15., theta: 0. });
  }

  #[test]
  fn test_with_least_median_of_squares() {
    let estimator = LeastMedianOfSquares::new(3, 20, SimilarityGenerator, SimilarityDistanceSq);
    let mut motion = MotionEstimator::new(estimator, 3, 1.);
    let shift = Vector2d::new(5., 0.);
    let mut pairs = vec![];
    for y in [45., 50., 55.] {
      for x in [40., 50., 60.] {
        let p0 = Vector2d::new(x, y);
        pairs.push(AssociatedPair { p0, p1: p0 + shift });
      }
    }
    let mut r = region();
    motion.estimate(&pairs, &mut r).unwrap();
    assert!((r.cx - 55.).abs() < 1e-9);
    assert!((r.cy - 50.).abs() < 1e-9);
    assert!((r.width - 20.).abs() < 1e-9);
    assert!(r.theta.abs() < 1e-9);
  }
}
