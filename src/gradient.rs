use crate::all::*;

pub trait GradientOperator {
  // Writes horizontal and vertical derivatives of `image`. The outputs are
  // reshaped to the input size.
  fn process(&self, image: &ImageF32, deriv_x: &mut ImageF32, deriv_y: &mut ImageF32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
  Scharr,
  CentralDifference,
}

pub fn gradient_operator(kind: GradientKind) -> Box<dyn GradientOperator> {
  match kind {
    GradientKind::Scharr => Box::new(Scharr),
    GradientKind::CentralDifference => Box::new(CentralDifference),
  }
}

// 3x3 Scharr kernel normalized so that a unit ramp has unit gradient.
pub struct Scharr;

impl GradientOperator for Scharr {
  fn process(&self, image: &ImageF32, out_x: &mut ImageF32, out_y: &mut ImageF32) {
    out_x.reshape(image.width, image.height);
    out_y.reshape(image.width, image.height);
    for y in 0..image.height {
      for x in 0..image.width {
        let v = |dx: i64, dy: i64| image.value_clamped(x as i64 + dx, y as i64 + dy);
        out_x.set_value(x, y, (10. * v(1, 0)
          + 3. * v(1, 1)
          + 3. * v(1, -1)
          - 10. * v(-1, 0)
          - 3. * v(-1, 1)
          - 3. * v(-1, -1)
        ) / 32.);
        out_y.set_value(x, y, (10. * v(0, 1)
          + 3. * v(1, 1)
          + 3. * v(-1, 1)
          - 10. * v(0, -1)
          - 3. * v(1, -1)
          - 3. * v(-1, -1)
        ) / 32.);
      }
    }
  }
}

pub struct CentralDifference;

impl GradientOperator for CentralDifference {
  fn process(&self, image: &ImageF32, out_x: &mut ImageF32, out_y: &mut ImageF32) {
    out_x.reshape(image.width, image.height);
    out_y.reshape(image.width, image.height);
    for y in 0..image.height {
      for x in 0..image.width {
        let (xi, yi) = (x as i64, y as i64);
        out_x.set_value(x, y, 0.5 * (image.value_clamped(xi + 1, yi) - image.value_clamped(xi - 1, yi)));
        out_y.set_value(x, y, 0.5 * (image.value_clamped(xi, yi + 1) - image.value_clamped(xi, yi - 1)));
      }
    }
  }
}
