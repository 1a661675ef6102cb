//! Presence-debounced entry/exit counting.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::counting::stats::{CountingStrategy, FrameStats};
use crate::tracker::{Label, TrackObservation};

/// First/last frame an id was observed at.
#[derive(Debug, Clone, Copy)]
struct PresenceRecord {
    first_seen: u64,
    last_seen: u64,
}

/// Debounced directional counter.
///
/// An id counts as entered once it has been present for `min_frames_to_count`
/// frames, suppressing detector flicker. It counts as exited once it has been
/// absent for more than `exit_timeout` frames, and only if its entry was
/// counted first. Both fire at most once per id, ever.
pub struct PresenceCounter {
    min_frames_to_count: u64,
    exit_timeout: u64,
    presence: HashMap<u64, PresenceRecord>,
    counted_entry: HashSet<u64>,
    counted_exit: HashSet<u64>,
    total_entered: u64,
    total_exited: u64,
    per_label: BTreeMap<Label, u64>,
}

impl PresenceCounter {
    pub fn new(min_frames_to_count: u64, exit_timeout: u64) -> Self {
        Self {
            min_frames_to_count,
            exit_timeout,
            presence: HashMap::new(),
            counted_entry: HashSet::new(),
            counted_exit: HashSet::new(),
            total_entered: 0,
            total_exited: 0,
            per_label: BTreeMap::new(),
        }
    }

    fn snapshot(&self, frame: u64, current_count: usize) -> FrameStats {
        FrameStats {
            frame,
            current_count,
            total_entered: self.total_entered,
            total_exited: self.total_exited,
            per_label: self.per_label.clone(),
        }
    }
}

impl CountingStrategy for PresenceCounter {
    fn update(&mut self, frame: u64, observed: &[TrackObservation]) -> FrameStats {
        for obs in observed {
            let record = self.presence.entry(obs.id).or_insert(PresenceRecord {
                first_seen: frame,
                last_seen: frame,
            });
            record.last_seen = frame;

            if !self.counted_entry.contains(&obs.id)
                && frame - record.first_seen >= self.min_frames_to_count
            {
                self.counted_entry.insert(obs.id);
                self.total_entered += 1;
                if let Some(label) = obs.label {
                    *self.per_label.entry(label).or_insert(0) += 1;
                }
            }
        }

        let present: HashSet<u64> = observed.iter().map(|o| o.id).collect();
        for (&id, record) in &self.presence {
            if present.contains(&id)
                || !self.counted_entry.contains(&id)
                || self.counted_exit.contains(&id)
            {
                continue;
            }
            if frame - record.last_seen > self.exit_timeout {
                self.counted_exit.insert(id);
                self.total_exited += 1;
            }
        }

        self.snapshot(frame, observed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn obs(id: u64, label: Option<Label>) -> TrackObservation {
        TrackObservation {
            id,
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            label,
        }
    }

    #[test]
    fn test_entry_fires_once_at_debounce_boundary() {
        let mut counter = PresenceCounter::new(8, 20);

        for frame in 1..=30 {
            let stats = counter.update(frame, &[obs(1, Some(Label::Male))]);
            // first_seen = 1, so frame - first_seen reaches 8 at frame 9
            if frame < 9 {
                assert_eq!(stats.total_entered, 0, "premature entry at frame {frame}");
            } else {
                assert_eq!(stats.total_entered, 1, "missing entry at frame {frame}");
            }
            assert_eq!(stats.current_count, 1);
        }

        let final_stats = counter.update(31, &[obs(1, Some(Label::Male))]);
        assert_eq!(final_stats.total_entered, 1);
        assert_eq!(final_stats.label_count(Label::Male), 1);
        assert_eq!(final_stats.label_count(Label::Female), 0);
    }

    #[test]
    fn test_exit_fires_once_after_timeout() {
        let mut counter = PresenceCounter::new(8, 20);

        // Present frames 1..=30, then gone.
        for frame in 1..=30 {
            counter.update(frame, &[obs(1, None)]);
        }
        for frame in 31..=60 {
            let stats = counter.update(frame, &[]);
            // last_seen = 30: exit once frame - 30 > 20, i.e. frame 51
            if frame < 51 {
                assert_eq!(stats.total_exited, 0, "premature exit at frame {frame}");
            } else {
                assert_eq!(stats.total_exited, 1, "missing exit at frame {frame}");
            }
            assert_eq!(stats.current_count, 0);
        }
    }

    #[test]
    fn test_exit_requires_counted_entry() {
        let mut counter = PresenceCounter::new(8, 2);

        // Present for too few frames to clear the debounce.
        for frame in 1..=3 {
            counter.update(frame, &[obs(1, None)]);
        }
        for frame in 4..=40 {
            let stats = counter.update(frame, &[]);
            assert_eq!(stats.total_entered, 0);
            assert_eq!(stats.total_exited, 0);
        }
    }

    #[test]
    fn test_reappearance_does_not_double_count_entry() {
        let mut counter = PresenceCounter::new(3, 100);

        for frame in 1..=10 {
            counter.update(frame, &[obs(1, None)]);
        }
        // Brief absence, then back: still one entry.
        for frame in 11..=12 {
            counter.update(frame, &[]);
        }
        let stats = counter.update(13, &[obs(1, None)]);
        assert_eq!(stats.total_entered, 1);
    }

    #[test]
    fn test_label_tally_taken_at_entry_time() {
        let mut counter = PresenceCounter::new(2, 20);

        // Unlabeled through the debounce window: entry counts, label does not.
        counter.update(1, &[obs(1, None)]);
        counter.update(2, &[obs(1, None)]);
        let stats = counter.update(3, &[obs(1, None)]);
        assert_eq!(stats.total_entered, 1);
        assert!(stats.per_label.is_empty());

        // A label arriving after entry fired is not retroactively tallied.
        let stats = counter.update(4, &[obs(1, Some(Label::Female))]);
        assert_eq!(stats.label_count(Label::Female), 0);
    }

    #[test]
    fn test_independent_ids_count_separately() {
        let mut counter = PresenceCounter::new(2, 20);

        for frame in 1..=5 {
            counter.update(
                frame,
                &[obs(1, Some(Label::Male)), obs(2, Some(Label::Female))],
            );
        }
        let stats = counter.update(6, &[obs(1, Some(Label::Male)), obs(2, Some(Label::Female))]);
        assert_eq!(stats.total_entered, 2);
        assert_eq!(stats.label_count(Label::Male), 1);
        assert_eq!(stats.label_count(Label::Female), 1);
        assert_eq!(stats.current_count, 2);
    }
}
