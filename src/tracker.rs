// Follows a rigid rotated rectangle from frame to frame with sparse optical
// flow: a grid of points inside the previous region is tracked forward and
// backward, and a robust similarity fit to the surviving points moves the
// region. Any frame where that fails loses the target until `init()` is
// called again.

use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
  Uninitialized,
  Active,
  Lost,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrackFailure {
  InsufficientCorrespondences { found: usize, required: usize },
  ModelFitFailed,
  FitQualityTooLow { error: f64, max_error: f64 },
  AlreadyLost,
  NotInitialized,
  FrameSizeMismatch { expected: [usize; 2], actual: [usize; 2] },
}

impl TrackFailure {
  // Precondition failures leave the tracker untouched.
  pub fn is_precondition(&self) -> bool {
    matches!(
      self,
      TrackFailure::AlreadyLost | TrackFailure::NotInitialized | TrackFailure::FrameSizeMismatch { .. }
    )
  }
}

impl fmt::Display for TrackFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrackFailure::InsufficientCorrespondences { found, required } => {
        write!(f, "Insufficient correspondences: {} (need {})", found, required)
      }
      TrackFailure::ModelFitFailed => write!(f, "Motion model fit failed"),
      TrackFailure::FitQualityTooLow { error, max_error } => {
        write!(f, "Fit quality too low: error {} exceeds {}", error, max_error)
      }
      TrackFailure::AlreadyLost => write!(f, "Track already lost"),
      TrackFailure::NotInitialized => write!(f, "Tracker not initialized"),
      TrackFailure::FrameSizeMismatch { expected, actual } => {
        write!(f, "Frame size {}x{} does not match {}x{}", actual[0], actual[1], expected[0], expected[1])
      }
    }
  }
}

impl std::error::Error for TrackFailure {}

pub type SimilarityLmeds = LeastMedianOfSquares<SimilarityGenerator, SimilarityDistanceSq>;

pub struct SparseFlowTracker<T = KltTracker, E = SimilarityLmeds> {
  parameters: ParameterSet,
  pyramids: PyramidPair,
  gradient: Box<dyn GradientOperator>,
  point_tracker: T,
  correspondences: CorrespondenceEngine,
  motion: MotionEstimator<E>,
  // Workspace.
  samples: Vec<Vector2d>,
  region: RotatedRectangle,
  state: TrackerState,
}

impl SparseFlowTracker {
  pub fn new(parameters: &ParameterSet) -> Result<SparseFlowTracker> {
    let estimator = LeastMedianOfSquares::new(
      parameters.random_seed,
      parameters.robust_cycles,
      SimilarityGenerator,
      SimilarityDistanceSq,
    );
    SparseFlowTracker::with_collaborators(parameters, KltTracker::new(parameters), estimator)
  }
}

impl<T, E> SparseFlowTracker<T, E>
where
  T: PointTracker,
  E: RobustEstimator<Model = SimilarityTransform>,
{
  pub fn with_collaborators(
    parameters: &ParameterSet,
    point_tracker: T,
    estimator: E,
  ) -> Result<SparseFlowTracker<T, E>> {
    parameters.validate().context("Invalid tracker parameters.")?;
    let p = parameters;
    Ok(SparseFlowTracker {
      parameters: p.clone(),
      pyramids: PyramidPair::new(),
      gradient: gradient_operator(p.gradient),
      point_tracker,
      correspondences: CorrespondenceEngine::new(p.max_error_fb, p.feature_radius),
      motion: MotionEstimator::new(estimator, p.min_correspondences, p.robust_max_error),
      samples: Vec::with_capacity(p.grid_size * p.grid_size),
      region: RotatedRectangle { cx: 0., cy: 0., width: 1., height: 1., theta: 0. },
      state: TrackerState::Uninitialized,
    })
  }

  pub fn init(&mut self, frame: &Image, region: RotatedRectangle) -> Result<()> {
    if frame.is_empty() {
      bail!("Cannot initialize tracker with an empty frame.");
    }
    if frame.data.len() != frame.width * frame.height {
      bail!("Frame data length {} does not match {}x{}.", frame.data.len(), frame.width, frame.height);
    }
    region.validate().context("Invalid initial region.")?;

    if !self.pyramids.matches(frame.width, frame.height) {
      let level_count = self.level_count(frame.width, frame.height);
      debug!("Allocating {} pyramid levels for {}x{} frames.", level_count, frame.width, frame.height);
      self.pyramids.initialize(frame.width, frame.height, level_count);
    }
    self.pyramids.process(frame, Role::Previous, &*self.gradient);
    self.region = region;
    self.state = TrackerState::Active;
    info!("Tracking initialized at {:?}.", self.region);
    Ok(())
  }

  pub fn update(&mut self, frame: &Image) -> Result<RotatedRectangle, TrackFailure> {
    match self.state {
      TrackerState::Uninitialized => return Err(TrackFailure::NotInitialized),
      TrackerState::Lost => return Err(TrackFailure::AlreadyLost),
      TrackerState::Active => {},
    }
    if !self.pyramids.matches(frame.width, frame.height)
      || frame.data.len() != frame.width * frame.height
    {
      let (previous, _) = self.pyramids.frames();
      return Err(TrackFailure::FrameSizeMismatch {
        expected: [previous.pyramid.width(), previous.pyramid.height()],
        actual: [frame.width, frame.height],
      });
    }

    self.pyramids.process(frame, Role::Current, &*self.gradient);
    sample_grid(&self.region, self.parameters.grid_size, &mut self.samples);
    let (previous, current) = self.pyramids.frames();
    let pairs = self.correspondences.process(
      &mut self.point_tracker,
      previous,
      current,
      &self.samples,
    );
    debug!("{} of {} samples survived forward-backward tracking.", pairs.len(), self.samples.len());

    match self.motion.estimate(pairs, &mut self.region) {
      Ok(model) => {
        debug!("Fitted {:?}.", model);
        self.pyramids.swap_roles();
        Ok(self.region)
      },
      Err(failure) => {
        warn!("Track lost: {}.", failure);
        self.state = TrackerState::Lost;
        Err(failure)
      },
    }
  }

  pub fn is_lost(&self) -> bool {
    self.state == TrackerState::Lost
  }

  pub fn state(&self) -> TrackerState {
    self.state
  }

  pub fn region(&self) -> &RotatedRectangle {
    &self.region
  }

  pub fn parameters(&self) -> &ParameterSet {
    &self.parameters
  }

  // Correspondences of the latest `update()`.
  pub fn correspondences(&self) -> &[AssociatedPair] {
    self.correspondences.pairs()
  }

  fn level_count(&self, width: usize, height: usize) -> usize {
    let radius = self.parameters.feature_radius;
    match self.parameters.pyramid_levels {
      Some(count) => clamp_level_count(width, height, radius, count),
      None => select_level_count(width, height, radius),
    }
  }
}
