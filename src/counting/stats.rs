//! Per-frame statistics snapshot and the counting strategy seam.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tracker::{Label, TrackObservation};

/// Immutable per-frame statistics snapshot, emitted once per processed frame
/// for overlay rendering and external reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Index of the frame this snapshot was taken at (1-based)
    pub frame: u64,
    /// Number of ids present in this frame's tracked set
    pub current_count: usize,
    /// Cumulative entries over the session
    pub total_entered: u64,
    /// Cumulative exits over the session
    pub total_exited: u64,
    /// Cumulative entries broken down by label
    pub per_label: BTreeMap<Label, u64>,
}

impl FrameStats {
    /// Cumulative tally for one label (0 when never counted).
    pub fn label_count(&self, label: Label) -> u64 {
        self.per_label.get(&label).copied().unwrap_or(0)
    }
}

/// A counting strategy consumes the current frame's tracked observations and
/// updates its directional tallies.
///
/// Strategies carry state for the life of a video session and are never reset
/// mid-stream.
pub trait CountingStrategy {
    /// Ingest one frame of tracked observations and return the updated stats.
    ///
    /// `frame` indices must be fed strictly increasing, one call per
    /// processed frame.
    fn update(&mut self, frame: u64, observed: &[TrackObservation]) -> FrameStats;
}
