//! Line-crossing entry/exit counting.

use std::collections::{BTreeMap, HashMap};

use crate::counting::stats::{CountingStrategy, FrameStats};
use crate::tracker::{Label, TrackObservation};

/// Direction an id was counted in. Recorded once, first crossing wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Entered,
    Exited,
}

/// Counter based on a tracked center crossing a horizontal image-space line.
///
/// A downward crossing of `line_y` counts as entered, an upward crossing as
/// exited. Each id is counted at most once, ever; later re-crossings are
/// ignored. The label tally is attributed at the moment of first counting.
pub struct LineCrossCounter {
    line_y: f32,
    prev_cy: HashMap<u64, f32>,
    counted_direction: HashMap<u64, Direction>,
    total_entered: u64,
    total_exited: u64,
    per_label: BTreeMap<Label, u64>,
}

impl LineCrossCounter {
    pub fn new(line_y: f32) -> Self {
        Self {
            line_y,
            prev_cy: HashMap::new(),
            counted_direction: HashMap::new(),
            total_entered: 0,
            total_exited: 0,
            per_label: BTreeMap::new(),
        }
    }

    pub fn line_y(&self) -> f32 {
        self.line_y
    }
}

impl CountingStrategy for LineCrossCounter {
    fn update(&mut self, frame: u64, observed: &[TrackObservation]) -> FrameStats {
        for obs in observed {
            let (_, cy) = obs.center();
            let prev = self.prev_cy.insert(obs.id, cy);

            let Some(prev) = prev else {
                // First sighting establishes the reference point only.
                continue;
            };
            if self.counted_direction.contains_key(&obs.id) {
                continue;
            }

            let crossed_down = prev < self.line_y && cy >= self.line_y;
            let crossed_up = prev > self.line_y && cy <= self.line_y;

            let direction = if crossed_down {
                Direction::Entered
            } else if crossed_up {
                Direction::Exited
            } else {
                continue;
            };

            self.counted_direction.insert(obs.id, direction);
            match direction {
                Direction::Entered => self.total_entered += 1,
                Direction::Exited => self.total_exited += 1,
            }
            if let Some(label) = obs.label {
                *self.per_label.entry(label).or_insert(0) += 1;
            }
        }

        FrameStats {
            frame,
            current_count: observed.len(),
            total_entered: self.total_entered,
            total_exited: self.total_exited,
            per_label: self.per_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn obs_at(id: u64, cy: f32, label: Option<Label>) -> TrackObservation {
        TrackObservation {
            id,
            rect: Rect::new(0.0, cy - 5.0, 10.0, cy + 5.0),
            label,
        }
    }

    #[test]
    fn test_downward_crossing_counts_as_entered() {
        let mut counter = LineCrossCounter::new(100.0);

        counter.update(1, &[obs_at(1, 90.0, Some(Label::Male))]);
        let stats = counter.update(2, &[obs_at(1, 105.0, Some(Label::Male))]);

        assert_eq!(stats.total_entered, 1);
        assert_eq!(stats.total_exited, 0);
        assert_eq!(stats.label_count(Label::Male), 1);
    }

    #[test]
    fn test_upward_crossing_counts_as_exited() {
        let mut counter = LineCrossCounter::new(100.0);

        counter.update(1, &[obs_at(1, 110.0, None)]);
        let stats = counter.update(2, &[obs_at(1, 95.0, None)]);

        assert_eq!(stats.total_entered, 0);
        assert_eq!(stats.total_exited, 1);
    }

    #[test]
    fn test_landing_exactly_on_line_counts() {
        let mut counter = LineCrossCounter::new(100.0);

        counter.update(1, &[obs_at(1, 90.0, None)]);
        let stats = counter.update(2, &[obs_at(1, 100.0, None)]);
        assert_eq!(stats.total_entered, 1);
    }

    #[test]
    fn test_first_crossing_wins() {
        let mut counter = LineCrossCounter::new(100.0);

        counter.update(1, &[obs_at(1, 90.0, None)]);
        counter.update(2, &[obs_at(1, 110.0, None)]); // down: entered
        counter.update(3, &[obs_at(1, 90.0, None)]); // back up: ignored
        let stats = counter.update(4, &[obs_at(1, 110.0, None)]); // down again: ignored

        assert_eq!(stats.total_entered, 1);
        assert_eq!(stats.total_exited, 0);
    }

    #[test]
    fn test_no_crossing_no_label_tally() {
        let mut counter = LineCrossCounter::new(100.0);

        // Hovering above the line for many frames: nothing is counted,
        // including the label.
        for frame in 1..=10 {
            let stats = counter.update(frame, &[obs_at(1, 50.0, Some(Label::Female))]);
            assert_eq!(stats.total_entered, 0);
            assert_eq!(stats.label_count(Label::Female), 0);
        }
    }

    #[test]
    fn test_first_sighting_never_counts() {
        let mut counter = LineCrossCounter::new(100.0);

        // An id appearing below the line has no previous center to compare.
        let stats = counter.update(1, &[obs_at(1, 150.0, None)]);
        assert_eq!(stats.total_entered, 0);
        assert_eq!(stats.total_exited, 0);
        assert_eq!(stats.current_count, 1);
    }
}
