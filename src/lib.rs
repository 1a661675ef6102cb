//! crowdflow-rs: people counting and occupancy analytics over per-frame
//! object detections.
//!
//! The crate turns a sequence of detections (boxes, labels, confidences)
//! produced by an external detector into stable per-object identities,
//! directional entry/exit counts, and a decaying spatial occupancy heatmap,
//! rendered as an annotated output frame stream.
//!
//! Detection inference, video codecs, and any serving surface live outside
//! this crate; they plug in through the [`pipeline::DetectorAdapter`],
//! [`pipeline::FrameSource`] and [`pipeline::FrameSink`] seams.
//!
//! # Example
//!
//! ```
//! use crowdflow_rs::{
//!     Detection, DetectorAdapter, MemoryFrameSink, MemoryFrameSource, PipelineConfig,
//!     VideoSession,
//! };
//! use image::RgbImage;
//!
//! struct StaticDetector;
//!
//! impl DetectorAdapter for StaticDetector {
//!     type Error = std::convert::Infallible;
//!
//!     fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
//!         Ok(vec![Detection::new(100.0, 100.0, 160.0, 260.0, 0.9)])
//!     }
//! }
//!
//! let frames = vec![RgbImage::new(640, 480); 12];
//! let mut source = MemoryFrameSource::new(frames, 25.0);
//! let mut sink = MemoryFrameSink::new();
//!
//! let session = VideoSession::new(StaticDetector, PipelineConfig::default());
//! let summary = session.run(&mut source, &mut sink).unwrap();
//! assert_eq!(summary.frames_out, 12);
//! ```

pub mod counting;
pub mod error;
pub mod heatmap;
pub mod pipeline;
pub mod tracker;

pub use counting::{CountingStrategy, FrameStats, LineCrossCounter, PresenceCounter};
pub use error::PipelineError;
pub use heatmap::{Heatmap, HeatmapConfig};
pub use pipeline::{
    CancelToken, CountingConfig, CountingMode, DetectorAdapter, FrameSink, FrameSource,
    LabelClassifier, MemoryFrameSink, MemoryFrameSource, NoopClassifier, OverlayRenderer,
    PipelineConfig, SessionSummary, VideoSession,
};
pub use tracker::{Detection, IouTracker, Label, Rect, Track, TrackObservation, TrackerConfig};
