//! Persistent per-object identity state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Object class label attached to detections and tracks.
///
/// The detector vocabulary for this system is the gender of a detected person;
/// `Option<Label>` covers the unknown case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Female,
    Male,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Female => write!(f, "female"),
            Label::Male => write!(f, "male"),
        }
    }
}

/// A persistent identity maintained across frames for one physical object.
///
/// Owned exclusively by the tracker; downstream components only ever see
/// [`TrackObservation`] snapshots.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique identifier, monotonically increasing from 1, never reused
    pub id: u64,
    /// Smoothed bounding box
    pub rect: Rect,
    /// Consecutive frames without a matching detection
    pub lost_count: u32,
    /// Sticky class label; set once from the first labeled detection
    pub label: Option<Label>,
    /// Lifecycle state
    pub state: TrackState,
}

impl Track {
    pub(crate) fn new(id: u64, rect: Rect, label: Option<Label>) -> Self {
        Self {
            id,
            rect,
            lost_count: 0,
            label,
            state: TrackState::Tracked,
        }
    }

    /// Absorb a matched detection box, smoothed by `alpha` towards the detection.
    pub(crate) fn absorb(&mut self, detection_rect: &Rect, alpha: f32) {
        self.rect = self.rect.blend(detection_rect, alpha);
        self.lost_count = 0;
        self.state = TrackState::Tracked;
    }

    /// Fill the label if it is still unset. Labels are sticky once set.
    pub(crate) fn adopt_label(&mut self, label: Option<Label>) {
        if self.label.is_none() {
            self.label = label;
        }
    }

    pub(crate) fn mark_missed(&mut self) {
        self.lost_count += 1;
        self.state = TrackState::Lost;
    }

    pub(crate) fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }
}

/// Read-only per-frame snapshot of a track, handed to the counting engine,
/// heatmap and overlay stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackObservation {
    pub id: u64,
    pub rect: Rect,
    pub label: Option<Label>,
}

impl TrackObservation {
    /// Center point of the observed box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        self.rect.center()
    }
}
