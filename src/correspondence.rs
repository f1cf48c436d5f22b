use crate::all::*;

// One sample point tracked from the previous frame (`p0`) to the current
// frame (`p1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssociatedPair {
  pub p0: Vector2d,
  pub p1: Vector2d,
}

// Tracks sample points forward and back again, and keeps those that return
// close to where they started.
pub struct CorrespondenceEngine {
  max_error_fb_sq: f64,
  feature: KltFeature,
  pairs: Vec<AssociatedPair>,
}

impl CorrespondenceEngine {
  // `max_error_fb` is in pixels.
  pub fn new(max_error_fb: f64, feature_radius: usize) -> CorrespondenceEngine {
    CorrespondenceEngine {
      max_error_fb_sq: max_error_fb * max_error_fb,
      feature: KltFeature::new(feature_radius),
      pairs: vec![],
    }
  }

  pub fn process<T: PointTracker + ?Sized>(
    &mut self,
    tracker: &mut T,
    previous: &Frame,
    current: &Frame,
    samples: &[Vector2d],
  ) -> &[AssociatedPair] {
    self.pairs.clear();
    for sample in samples {
      if let Some(p1) = self.track_sample(tracker, previous, current, *sample) {
        self.pairs.push(AssociatedPair { p0: *sample, p1 });
      }
    }
    &self.pairs
  }

  pub fn pairs(&self) -> &[AssociatedPair] {
    &self.pairs
  }

  fn track_sample<T: PointTracker + ?Sized>(
    &mut self,
    tracker: &mut T,
    previous: &Frame,
    current: &Frame,
    sample: Vector2d,
  ) -> Option<Vector2d> {
    let feature = &mut self.feature;
    feature.position = sample;
    if !tracker.set_description(previous, feature) { return None }
    if tracker.track(current, feature) != TrackFault::Success { return None }
    let forward = feature.position;

    if !tracker.set_description(current, feature) { return None }
    if tracker.track(previous, feature) != TrackFault::Success { return None }
    if forward_backward_error(sample, feature.position) > self.max_error_fb_sq { return None }
    Some(forward)
  }
}

// Squared distance between a sample and where it returned to.
#[inline(always)]
pub fn forward_backward_error(origin: Vector2d, returned: Vector2d) -> f64 {
  (origin - returned).norm_squared()
}
