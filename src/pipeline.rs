//! Frame compositing and session orchestration.
//!
//! This module wires the external collaborators (detector, frame source,
//! frame sink) to the stateful stages (tracker, counting engine, heatmap)
//! and drives one video at a time through them.

mod config;
mod detector;
mod io;
mod overlay;
mod session;

pub use config::{CountingConfig, CountingMode, PipelineConfig};
pub use detector::{DetectorAdapter, LabelClassifier, NoopClassifier};
pub use io::{FrameSink, FrameSource, MemoryFrameSink, MemoryFrameSource};
pub use overlay::OverlayRenderer;
pub use session::{CancelToken, SessionSummary, VideoSession};
