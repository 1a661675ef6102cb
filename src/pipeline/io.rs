//! Frame source and sink seams, with in-memory implementations.
//!
//! Video decode/encode lives outside this crate; sessions consume decoded
//! frames through [`FrameSource`] and hand annotated frames to a
//! [`FrameSink`]. The in-memory implementations below back the tests and any
//! embedding that does its own codec work.

use image::RgbImage;

use crate::error::PipelineError;

/// Sequential decoded-frame input for one video session.
pub trait FrameSource {
    /// Frame width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Target frames per second of the underlying stream.
    fn fps(&self) -> f32;

    /// Pull the next frame; `Ok(None)` signals a clean end of stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, PipelineError>;
}

/// Destination for annotated output frames, one per input frame.
pub trait FrameSink {
    fn write(&mut self, frame: &RgbImage) -> Result<(), PipelineError>;

    /// Finalize the output. Called once on the success path; dropping the
    /// sink without `finish` must still release its resources.
    fn finish(&mut self) -> Result<(), PipelineError>;
}

/// Frame source backed by a preloaded frame list.
pub struct MemoryFrameSource {
    frames: std::vec::IntoIter<RgbImage>,
    dimensions: (u32, u32),
    fps: f32,
}

impl MemoryFrameSource {
    /// Build from decoded frames. Dimensions are taken from the first frame;
    /// an empty list yields a source that reports 0x0 and ends immediately.
    pub fn new(frames: Vec<RgbImage>, fps: f32) -> Self {
        let dimensions = frames
            .first()
            .map(|f| f.dimensions())
            .unwrap_or((0, 0));
        Self {
            frames: frames.into_iter(),
            dimensions,
            fps,
        }
    }
}

impl FrameSource for MemoryFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn fps(&self) -> f32 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, PipelineError> {
        Ok(self.frames.next())
    }
}

/// Frame sink that collects annotated frames in memory.
#[derive(Default)]
pub struct MemoryFrameSink {
    frames: Vec<RgbImage>,
    finished: bool,
}

impl MemoryFrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the sink and take the collected frames.
    pub fn into_frames(self) -> Vec<RgbImage> {
        self.frames
    }
}

impl FrameSink for MemoryFrameSink {
    fn write(&mut self, frame: &RgbImage) -> Result<(), PipelineError> {
        if self.finished {
            return Err(PipelineError::Sink("write after finish".into()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), PipelineError> {
        self.finished = true;
        Ok(())
    }
}
