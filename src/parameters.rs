use crate::all::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(clap::Parser)]
#[serde(default)]
pub struct ParameterSet {
  // Sample grid resolution, the grid has `grid_size^2` points.
  #[clap(long, default_value = "15")]
  pub grid_size: usize,
  // Maximum forward-backward tracking error in pixels.
  #[clap(long, default_value = "1.0")]
  pub max_error_fb: f64,
  #[clap(long, default_value = "15")]
  pub min_correspondences: usize,

  // Least median of squares motion estimation.
  #[clap(long, default_value = "50")]
  pub robust_cycles: usize,
  // Largest accepted median squared residual in pixels^2.
  #[clap(long, default_value = "10.0")]
  pub robust_max_error: f64,
  #[clap(long, default_value = "3735928559")]
  pub random_seed: u64,

  // Pyramidal Lucas-Kanade feature tracker.
  #[clap(long, default_value = "5")]
  pub feature_radius: usize,
  // Chosen from the frame size if not set.
  #[clap(long)]
  pub pyramid_levels: Option<usize>,
  #[clap(long, default_value = "15")]
  pub lk_iters: usize,
  #[clap(long, default_value = "0.001")]
  pub lk_min_determinant: f64,
  #[clap(long, default_value = "0.01")]
  pub lk_min_delta: f64,
  // Mean absolute intensity difference over the feature window.
  #[clap(long, default_value = "25.0")]
  pub lk_max_pixel_error: f64,
  #[clap(long, value_enum, default_value = "scharr")]
  pub gradient: GradientKind,
}

impl Default for ParameterSet {
  fn default() -> Self {
    ParameterSet {
      grid_size: 15,
      max_error_fb: 1.,
      min_correspondences: 15,
      robust_cycles: 50,
      robust_max_error: 10.,
      random_seed: 0xDEADBEEF,
      feature_radius: 5,
      pyramid_levels: None,
      lk_iters: 15,
      lk_min_determinant: 0.001,
      lk_min_delta: 0.01,
      lk_max_pixel_error: 25.,
      gradient: GradientKind::Scharr,
    }
  }
}

impl ParameterSet {
  // Fields missing from the JSON file keep their default values.
  pub fn load(path: &Path) -> Result<ParameterSet> {
    let s = std::fs::read_to_string(path)
      .context(format!("Failed to read file {}.", path.display()))?;
    let p: ParameterSet = serde_json::from_str(&s)
      .context(format!("Failed to parse {}.", path.display()))?;
    p.validate()?;
    Ok(p)
  }

  pub fn validate(&self) -> Result<()> {
    if self.grid_size < 2 {
      bail!("Grid size must be at least 2.");
    }
    if self.feature_radius < 1 {
      bail!("Feature radius must be at least 1.");
    }
    if self.robust_cycles == 0 {
      bail!("Robust estimation needs at least one cycle.");
    }
    if self.lk_iters == 0 {
      bail!("Lucas-Kanade needs at least one iteration.");
    }
    if self.pyramid_levels == Some(0) {
      bail!("Pyramid must have at least one level.");
    }
    let thresholds = [
      ("max_error_fb", self.max_error_fb),
      ("robust_max_error", self.robust_max_error),
      ("lk_min_determinant", self.lk_min_determinant),
      ("lk_min_delta", self.lk_min_delta),
      ("lk_max_pixel_error", self.lk_max_pixel_error),
    ];
    for (name, value) in thresholds {
      if !value.is_finite() || value < 0. {
        bail!("Parameter {} must be a non-negative number, got {}.", name, value);
      }
    }
    Ok(())
  }
}
