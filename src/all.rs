// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  correspondence::*,
  frame::*,
  gradient::*,
  image::*,
  math::*,
  motion::*,
  optical_flow::*,
  parameters::*,
  pyramid::*,
  pyramid_pair::*,
  rectangle::*,
  robust::*,
  sample_grid::*,
  similarity::*,
  tracker::*,
  types::*,
};

pub use {
  std::{
    fmt,
    ops::Index,
    path::Path,
    str::FromStr,
  },
  log::{debug, info, warn},
  serde::{Deserialize, Serialize},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
