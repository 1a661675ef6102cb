//! Crate-level error type.

use thiserror::Error;

/// Fatal session-level failures.
///
/// Per-frame detector failures are not represented here: the pipeline
/// degrades them to an empty detection list and keeps going.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The frame source produced zero frames.
    #[error("frame source yielded no frames")]
    EmptySource,

    /// The session finished without writing a single output frame.
    ///
    /// Distinct from [`PipelineError::EmptySource`]: the input had frames but
    /// the output ended up empty, which points at a processing failure.
    #[error("no frames were written to the sink")]
    EmptyOutput,

    /// Cancellation was requested; the session stopped at a frame boundary.
    #[error("session cancelled at frame {frame}")]
    Cancelled { frame: u64 },

    /// The frame source failed mid-stream.
    #[error("frame source failure: {0}")]
    Source(String),

    /// The frame sink could not be written to or finalized.
    #[error("frame sink failure: {0}")]
    Sink(String),
}
