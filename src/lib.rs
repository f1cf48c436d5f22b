//! Rigid region tracking with sparse optical flow.
//!
//! A rotated rectangle is followed from frame to frame by tracking a grid of
//! points inside it with pyramidal Lucas-Kanade, discarding points that do
//! not survive a forward-backward check, and fitting a similarity transform
//! to the rest with least median of squares.

mod all;
pub mod correspondence;
pub mod frame;
pub mod gradient;
pub mod image;
pub mod math;
pub mod motion;
pub mod optical_flow;
pub mod parameters;
pub mod pyramid;
pub mod pyramid_pair;
pub mod rectangle;
pub mod robust;
pub mod sample_grid;
pub mod similarity;
pub mod tracker;
pub mod types;
pub mod util;
pub mod video;

pub use crate::{
  image::Image,
  parameters::ParameterSet,
  rectangle::RotatedRectangle,
  tracker::{SparseFlowTracker, TrackFailure, TrackerState},
};
