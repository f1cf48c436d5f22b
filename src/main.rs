use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use serde::Serialize;

use sparse_flow::{
  util,
  video::VideoInput,
  ParameterSet,
  RotatedRectangle,
  SparseFlowTracker,
};

#[derive(Parser)]
struct Args {
  #[clap(short)]
  input_video: String,
  #[clap(long)]
  width: usize,
  #[clap(long)]
  height: usize,
  // Initial region in the first frame: `cx,cy,width,height[,theta]`.
  #[clap(long)]
  region: String,
  // JSON file of tracker parameters, overrides the flags below.
  #[clap(long)]
  config: Option<String>,
  #[clap(flatten)]
  parameters: ParameterSet,
}

#[derive(Serialize)]
struct Output<'a> {
  frame: usize,
  region: Option<&'a RotatedRectangle>,
  status: String,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  util::init_logging(LevelFilter::Info);
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  let parameters = match &args.config {
    Some(path) => ParameterSet::load(Path::new(path))?,
    None => args.parameters.clone(),
  };
  let region: RotatedRectangle = args.region.parse()?;
  let mut tracker = SparseFlowTracker::new(&parameters)?;
  let mut video = VideoInput::new(Path::new(&args.input_video), args.width, args.height)?;

  let mut frame_number = 0;
  while let Some(frame) = video.read()? {
    let (region, status) = if frame_number == 0 {
      tracker.init(frame, region)?;
      (Some(*tracker.region()), "initialized".to_string())
    }
    else {
      match tracker.update(frame) {
        Ok(region) => (Some(region), "tracking".to_string()),
        Err(failure) => (None, failure.to_string()),
      }
    };
    let output = Output {
      frame: frame_number,
      region: region.as_ref(),
      status,
    };
    println!("{}", serde_json::to_string(&output).context("Failed to serialize output.")?);
    frame_number += 1;
    if tracker.is_lost() {
      warn!("Stopping after the track was lost, re-initialization is up to the caller.");
      break;
    }
  }
  info!("Processed {} frames.", frame_number);
  Ok(())
}
