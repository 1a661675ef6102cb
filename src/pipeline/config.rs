//! Session configuration surface.

use serde::{Deserialize, Serialize};

use crate::heatmap::HeatmapConfig;
use crate::tracker::TrackerConfig;

/// Which counting strategy the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Presence-debounced entry/exit (primary)
    #[default]
    Presence,
    /// Entry/exit on crossing a horizontal line
    LineCross,
}

/// Counting engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountingConfig {
    #[serde(default)]
    pub mode: CountingMode,
    /// Frames an id must be present before its entry is counted
    #[serde(default = "default_min_frames_to_count")]
    pub min_frames_to_count: u64,
    /// Frames an id must be absent before its exit is counted
    #[serde(default = "default_exit_timeout")]
    pub exit_timeout: u64,
    /// Counting line y in pixels; when unset the line sits at 55% of the
    /// frame height
    #[serde(default)]
    pub line_y: Option<f32>,
}

fn default_min_frames_to_count() -> u64 {
    8
}

fn default_exit_timeout() -> u64 {
    20
}

impl Default for CountingConfig {
    fn default() -> Self {
        Self {
            mode: CountingMode::default(),
            min_frames_to_count: default_min_frames_to_count(),
            exit_timeout: default_exit_timeout(),
            line_y: None,
        }
    }
}

/// Full configuration for one video session.
///
/// Defaults mirror the production tuning; every field can be overridden
/// individually when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tracker: TrackerConfig,
    pub counting: CountingConfig,
    pub heatmap: HeatmapConfig,
    /// Run detection/tracking/counting on every Nth frame only; skipped
    /// frames re-emit the previous annotated frame. 0 and 1 both mean
    /// "process every frame".
    pub frame_skip: u32,
    /// Detections below this confidence are discarded before tracking
    pub detector_conf_threshold: f32,
    /// Classifier results below this confidence are ignored
    pub label_conf_threshold: f32,
    /// Width in pixels of the statistics sidebar appended to output frames
    pub sidebar_width: u32,
    /// Edge length in pixels of the square heatmap inset
    pub heatmap_inset: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            counting: CountingConfig::default(),
            heatmap: HeatmapConfig::default(),
            frame_skip: 3,
            detector_conf_threshold: 0.25,
            label_conf_threshold: 0.55,
            sidebar_width: 320,
            heatmap_inset: 240,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"frame_skip": 1, "counting": {"mode": "line_cross"}}"#)
                .unwrap();

        assert_eq!(config.frame_skip, 1);
        assert_eq!(config.counting.mode, CountingMode::LineCross);
        assert_eq!(config.counting.min_frames_to_count, 8);
        assert_eq!(config.tracker.max_lost, 25);
        assert!((config.heatmap.decay - 0.985).abs() < 1e-6);
    }
}
