// Least median of squares model fitting. Each cycle fits a model to a random
// minimal sample and scores it by the median distance over all pairs.

use crate::all::*;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

pub trait ModelGenerator {
  type Model;

  fn min_points(&self) -> usize;

  fn generate(&self, sample: &[AssociatedPair]) -> Option<Self::Model>;
}

pub trait ModelDistance {
  type Model;

  fn distance(&self, model: &Self::Model, pair: &AssociatedPair) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit<M> {
  pub model: M,
  // Fit quality, lower is better. For `LeastMedianOfSquares` the median
  // distance of the selected model.
  pub error: f64,
}

pub trait RobustEstimator {
  type Model;

  // None if no model could be fitted.
  fn estimate(&mut self, pairs: &[AssociatedPair]) -> Option<Fit<Self::Model>>;
}

pub struct LeastMedianOfSquares<G, D> {
  generator: G,
  distance: D,
  cycles: usize,
  rng: Xoshiro256PlusPlus,
  // Workspace.
  sample: Vec<AssociatedPair>,
  errors: Vec<f64>,
}

impl<G, D> LeastMedianOfSquares<G, D> {
  pub fn new(seed: u64, cycles: usize, generator: G, distance: D) -> LeastMedianOfSquares<G, D> {
    LeastMedianOfSquares {
      generator,
      distance,
      cycles,
      rng: Xoshiro256PlusPlus::seed_from_u64(seed),
      sample: vec![],
      errors: vec![],
    }
  }
}

impl<M, G, D> RobustEstimator for LeastMedianOfSquares<G, D>
where
  G: ModelGenerator<Model = M>,
  D: ModelDistance<Model = M>,
{
  type Model = M;

  fn estimate(&mut self, pairs: &[AssociatedPair]) -> Option<Fit<M>> {
    let k = self.generator.min_points();
    if pairs.len() < k { return None }

    let mut best: Option<Fit<M>> = None;
    for _ in 0..self.cycles {
      self.sample.clear();
      for i in rand::seq::index::sample(&mut self.rng, pairs.len(), k).iter() {
        self.sample.push(pairs[i]);
      }
      let model = match self.generator.generate(&self.sample) {
        Some(model) => model,
        None => continue,
      };

      self.errors.clear();
      for pair in pairs {
        self.errors.push(self.distance.distance(&model, pair));
      }
      let mid = self.errors.len() / 2;
      let (_, median, _) = self.errors.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
      let median = *median;

      if best.as_ref().map_or(true, |x| median < x.error) {
        best = Some(Fit { model, error: median });
      }
    }
    best
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn estimator(seed: u64) -> LeastMedianOfSquares<SimilarityGenerator, SimilarityDistanceSq> {
    LeastMedianOfSquares::new(seed, 50, SimilarityGenerator, SimilarityDistanceSq)
  }

  fn translated_grid(shift: Vector2d) -> Vec<AssociatedPair> {
    let mut pairs = vec![];
    for y in 0..5 {
      for x in 0..5 {
        let p0 = Vector2d::new(10. * x as f64, 8. * y as f64);
        pairs.push(AssociatedPair { p0, p1: p0 + shift });
      }
    }
    pairs
  }

  #[test]
  fn test_rejects_outliers() {
    let shift = Vector2d::new(4., -1.);
    let mut pairs = translated_grid(shift);
    // Corrupt a third of the pairs.
    for (i, pair) in pairs.iter_mut().enumerate() {
      if i % 3 == 0 {
        pair.p1 += Vector2d::new(30. - i as f64, 2. * i as f64 - 20.);
      }
    }
    let fit = estimator(1).estimate(&pairs).unwrap();
    assert!(fit.error < 1e-12);
    assert!((fit.model.scale - 1.).abs() < 1e-9);
    assert!(fit.model.theta.abs() < 1e-9);
    assert!((fit.model.translation - shift).norm() < 1e-9);
  }

  #[test]
  fn test_same_seed_same_fit() {
    let mut pairs = translated_grid(Vector2d::new(1., 2.));
    for (i, pair) in pairs.iter_mut().enumerate() {
      pair.p1 += 0.1 * Vector2d::new((i % 7) as f64, (i % 5) as f64);
    }
    let a = estimator(7).estimate(&pairs).unwrap();
    let b = estimator(7).estimate(&pairs).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn test_too_few_pairs() {
    let pairs = translated_grid(Vector2d::zeros());
    assert!(estimator(0).estimate(&pairs[..2]).is_none());
    assert!(estimator(0).estimate(&[]).is_none());
  }

  #[test]
  fn test_degenerate_pairs() {
    let p = Vector2d::new(5., 5.);
    let pairs = vec![AssociatedPair { p0: p, p1: p }; 10];
    assert!(estimator(0).estimate(&pairs).is_none());
  }
}
