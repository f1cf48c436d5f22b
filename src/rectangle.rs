use crate::all::*;

// Tracked region in image pixels. `theta` rotates the rectangle's local frame
// around its center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRectangle {
  pub cx: f64,
  pub cy: f64,
  pub width: f64,
  pub height: f64,
  pub theta: f64,
}

impl RotatedRectangle {
  pub fn new(cx: f64, cy: f64, width: f64, height: f64, theta: f64) -> Result<RotatedRectangle> {
    let rectangle = RotatedRectangle { cx, cy, width, height, theta };
    rectangle.validate()?;
    Ok(rectangle)
  }

  pub fn validate(&self) -> Result<()> {
    if ![self.cx, self.cy, self.width, self.height, self.theta].iter().all(|x| x.is_finite()) {
      bail!("Rectangle has non-finite values: {:?}.", self);
    }
    if self.width <= 0. || self.height <= 0. {
      bail!("Rectangle width and height must be positive, got {}x{}.", self.width, self.height);
    }
    Ok(())
  }

  pub fn center(&self) -> Vector2d {
    Vector2d::new(self.cx, self.cy)
  }

  // Maps a point of the unit square centered at the origin into the image.
  pub fn local_to_image(&self, local: Vector2d) -> Vector2d {
    let scaled = Vector2d::new(local[0] * self.width, local[1] * self.height);
    self.center() + rotate(self.theta, scaled)
  }

  // The center moves like any tracked point, the extents only scale.
  pub fn apply(&mut self, model: &SimilarityTransform) {
    let center = model.apply(self.center());
    self.cx = center[0];
    self.cy = center[1];
    self.width *= model.scale;
    self.height *= model.scale;
    self.theta += model.theta;
  }
}

// Parses `cx,cy,width,height[,theta]`.
impl FromStr for RotatedRectangle {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let values = s.split(',')
      .map(|x| x.trim().parse::<f64>().with_context(|| format!("Bad number `{}` in region `{}`.", x, s)))
      .collect::<Result<Vec<_>>>()?;
    match values[..] {
      [cx, cy, width, height] => RotatedRectangle::new(cx, cy, width, height, 0.),
      [cx, cy, width, height, theta] => RotatedRectangle::new(cx, cy, width, height, theta),
      _ => bail!("Region must have 4 or 5 comma separated values, got `{}`.", s),
    }
  }
}
