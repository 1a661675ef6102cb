//! Greedy IoU association and track lifecycle management.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;
use crate::tracker::track::{Label, Track, TrackObservation};

/// Detection input for the tracker, produced fresh each frame by the
/// external detector adapter.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box in TLBR format
    pub bbox: Rect,
    /// Class label, if the detector produced one
    pub label: Option<Label>,
    /// Detection confidence score
    pub confidence: f32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            bbox: Rect::new(x1, y1, x2, y2),
            label: None,
            confidence,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }
}

/// Configuration for the greedy IoU tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minimum IoU for a detection to be absorbed by an existing track
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    /// Consecutive unmatched frames a track survives; removed once exceeded
    #[serde(default = "default_max_lost")]
    pub max_lost: u32,
    /// Box smoothing factor: `new = alpha * detection + (1 - alpha) * old`
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,
}

fn default_iou_threshold() -> f32 {
    0.35
}

fn default_max_lost() -> u32 {
    25
}

fn default_smoothing_alpha() -> f32 {
    0.7
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: default_iou_threshold(),
            max_lost: default_max_lost(),
            smoothing_alpha: default_smoothing_alpha(),
        }
    }
}

/// Greedy per-frame associator between detections and persistent tracks.
///
/// Matching is order-dependent by design: each detection, in input order,
/// claims the unassigned track with the highest IoU. This is deliberately not
/// a minimum-cost bipartite assignment; the `update` contract is the seam
/// where an optimal matcher could be swapped in later.
pub struct IouTracker {
    config: TrackerConfig,
    tracks: HashMap<u64, Track>,
    next_id: u64,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: HashMap::new(),
            next_id: 1,
        }
    }

    /// Consume one frame of detections and return observations for every
    /// track assigned this frame (matched or newly created).
    ///
    /// Tracks left unmatched accrue `lost_count`; once it exceeds `max_lost`
    /// the identity is permanently retired.
    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackObservation> {
        let mut assigned: HashSet<u64> = HashSet::new();
        let mut observations = Vec::with_capacity(detections.len());

        for det in detections {
            let best = self.best_unassigned_match(&det.bbox, &assigned);

            match best {
                Some((tid, score)) if score >= self.config.iou_threshold => {
                    let track = self
                        .tracks
                        .get_mut(&tid)
                        .unwrap_or_else(|| unreachable!("matched id is live"));
                    track.absorb(&det.bbox, self.config.smoothing_alpha);
                    track.adopt_label(det.label);
                    assigned.insert(tid);
                    observations.push(TrackObservation {
                        id: tid,
                        rect: track.rect,
                        label: track.label,
                    });
                }
                _ => {
                    let tid = self.next_id;
                    self.next_id += 1;
                    let track = Track::new(tid, det.bbox, det.label);
                    observations.push(TrackObservation {
                        id: tid,
                        rect: track.rect,
                        label: track.label,
                    });
                    self.tracks.insert(tid, track);
                    assigned.insert(tid);
                }
            }
        }

        // Age out everything that went unmatched this frame.
        let max_lost = self.config.max_lost;
        self.tracks.retain(|tid, track| {
            if assigned.contains(tid) {
                return true;
            }
            track.mark_missed();
            if track.lost_count > max_lost {
                track.mark_removed();
                false
            } else {
                true
            }
        });

        observations
    }

    /// Highest-IoU live track not yet assigned this frame.
    ///
    /// Ties break towards the lowest id so results do not depend on map
    /// iteration order.
    fn best_unassigned_match(&self, bbox: &Rect, assigned: &HashSet<u64>) -> Option<(u64, f32)> {
        let mut best: Option<(u64, f32)> = None;
        for (&tid, track) in &self.tracks {
            if assigned.contains(&tid) {
                continue;
            }
            let score = bbox.iou(&track.rect);
            if score <= 0.0 {
                continue;
            }
            match best {
                Some((best_tid, best_score))
                    if score < best_score || (score == best_score && tid > best_tid) => {}
                _ => best = Some((tid, score)),
            }
        }
        best
    }

    /// Look up a live track.
    pub fn get(&self, id: u64) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Current label of a live track.
    pub fn label(&self, id: u64) -> Option<Label> {
        self.tracks.get(&id).and_then(|t| t.label)
    }

    /// Fill in a track's label from an external classifier.
    ///
    /// Respects stickiness: a label already set is kept.
    pub fn set_label(&mut self, id: u64, label: Label) {
        if let Some(track) = self.tracks.get_mut(&id) {
            track.adopt_label(Some(label));
        }
    }

    /// Number of live (tracked or lost) identities.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate over live tracks in no particular order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }
}
