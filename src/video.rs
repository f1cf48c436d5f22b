use crate::all::*;

use std::io::{ErrorKind, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

// Decodes a video into 8-bit grayscale frames with an `ffmpeg` child process.
// The frame size must be given because raw video carries no header.
pub struct VideoInput {
  child: Child,
  child_stdout: ChildStdout,
  frame: Image,
}

impl VideoInput {
  pub fn new(path: &Path, width: usize, height: usize) -> Result<VideoInput> {
    if width == 0 || height == 0 {
      bail!("Video dimensions must be positive, got {}x{}.", width, height);
    }
    let path = path.to_str().ok_or(anyhow!("Failed to parse video path."))?;
    let mut child = Command::new("ffmpeg")
      .args([
        "-loglevel", "error",
        "-i", path,
        "-f", "rawvideo",
        "-vcodec", "rawvideo",
        "-vsync", "vfr",
        "-vf", &format!("scale={}:{}", width, height),
        "-pix_fmt", "gray",
        "-",
      ])
      .stdout(Stdio::piped())
      .spawn()
      .context("Failed to start ffmpeg.")?;
    let child_stdout = child.stdout.take().ok_or(anyhow!("ffmpeg has no stdout."))?;
    Ok(VideoInput {
      child,
      child_stdout,
      frame: Image {
        data: vec![0; width * height],
        width,
        height,
      },
    })
  }

  // End of the video is signaled by `Result::Ok(Option::None)`.
  pub fn read(&mut self) -> Result<Option<&Image>> {
    match self.child_stdout.read_exact(&mut self.frame.data) {
      Ok(()) => Ok(Some(&self.frame)),
      Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
      Err(err) => Err(err).context("Reading bytes from video input failed."),
    }
  }
}

impl Drop for VideoInput {
  fn drop(&mut self) {
    let _ = self.child.kill();
    let _ = self.child.wait();
  }
}
