//! Per-video session orchestration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ab_glyph::FontArc;
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::counting::{CountingStrategy, FrameStats, LineCrossCounter, PresenceCounter};
use crate::error::PipelineError;
use crate::heatmap::Heatmap;
use crate::pipeline::config::{CountingMode, PipelineConfig};
use crate::pipeline::detector::{DetectorAdapter, LabelClassifier};
use crate::pipeline::io::{FrameSink, FrameSource};
use crate::pipeline::overlay::OverlayRenderer;
use crate::tracker::{Detection, IouTracker};

/// Cooperative cancellation flag, checked between frames.
///
/// Frame boundaries are the only safe suspension point; a cancelled session
/// stops before pulling its next frame and reports [`PipelineError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// End-of-session report.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// Frames pulled from the source
    pub frames_in: u64,
    /// Frames that went through detection/tracking/counting
    pub frames_processed: u64,
    /// Frames written to the sink (always equals `frames_in` on success)
    pub frames_out: u64,
    /// Statistics as of the last processed frame
    pub stats: FrameStats,
}

/// Drives one video through the full pipeline:
/// detector -> tracker -> classifier -> counting -> heatmap -> overlay -> sink.
///
/// A session owns all temporal state for exactly one video; nothing is shared
/// or carried across videos. Independent videos run in independent sessions,
/// parallelized by the caller if desired.
pub struct VideoSession<D: DetectorAdapter> {
    detector: D,
    config: PipelineConfig,
    classifier: Option<Box<dyn LabelClassifier>>,
    font: Option<FontArc>,
    cancel: CancelToken,
    on_stats: Option<Box<dyn FnMut(&FrameStats)>>,
}

impl<D: DetectorAdapter> VideoSession<D> {
    pub fn new(detector: D, config: PipelineConfig) -> Self {
        Self {
            detector,
            config,
            classifier: None,
            font: None,
            cancel: CancelToken::new(),
            on_stats: None,
        }
    }

    /// Attach a secondary classifier for tracks the detector left unlabeled.
    pub fn with_classifier(mut self, classifier: impl LabelClassifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Font for captions and sidebar text.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Share a cancellation token with an external supervisor.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Receive the [`FrameStats`] snapshot of every processed frame.
    pub fn on_stats(mut self, callback: impl FnMut(&FrameStats) + 'static) -> Self {
        self.on_stats = Some(Box::new(callback));
        self
    }

    /// Run the session to completion, consuming it.
    ///
    /// Emits exactly one output frame per input frame regardless of the
    /// frame-skip factor. A source that yields zero frames is a fatal
    /// [`PipelineError::EmptySource`]; per-frame detector failures degrade to
    /// an empty detection list so transient hiccups do not kill live tracks.
    pub fn run(
        mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
    ) -> Result<SessionSummary, PipelineError> {
        let first = source.next_frame()?.ok_or(PipelineError::EmptySource)?;
        let (width, height) = first.dimensions();
        info!(width, height, fps = source.fps() as f64, "session started");

        let line_y = self
            .config
            .counting
            .line_y
            .unwrap_or(height as f32 * 0.55);

        let mut tracker = IouTracker::new(self.config.tracker.clone());
        let mut counter: Box<dyn CountingStrategy> = match self.config.counting.mode {
            CountingMode::Presence => Box::new(PresenceCounter::new(
                self.config.counting.min_frames_to_count,
                self.config.counting.exit_timeout,
            )),
            CountingMode::LineCross => Box::new(LineCrossCounter::new(line_y)),
        };
        let mut heatmap = Heatmap::new(width, height, self.config.heatmap.clone());
        let mut renderer =
            OverlayRenderer::new(self.config.sidebar_width, self.config.heatmap_inset);
        if let Some(font) = self.font.take() {
            renderer = renderer.with_font(font);
        }

        let skip = self.config.frame_skip.max(1) as u64;
        let mut frame_idx: u64 = 0;
        let mut frames_processed: u64 = 0;
        let mut frames_out: u64 = 0;
        let mut last_annotated: Option<RgbImage> = None;
        let mut last_stats = FrameStats::default();

        let mut next = Some(first);
        while let Some(frame) = next {
            if self.cancel.is_cancelled() {
                info!(frame = frame_idx, "session cancelled");
                return Err(PipelineError::Cancelled { frame: frame_idx });
            }
            frame_idx += 1;

            let should_process = skip == 1 || frame_idx % skip == 1;
            if !should_process && last_annotated.is_some() {
                // Skipped frame: replicate the last annotated frame so output
                // count matches input count without touching any pipeline
                // state.
                if let Some(previous) = &last_annotated {
                    sink.write(previous)?;
                    frames_out += 1;
                }
            } else {
                let detections = match self.detector.detect(&frame) {
                    Ok(dets) => dets,
                    Err(err) => {
                        warn!(frame = frame_idx, error = %err,
                            "detector failed, degrading to empty frame");
                        Vec::new()
                    }
                };
                let detections: Vec<Detection> = detections
                    .into_iter()
                    .filter(|d| d.confidence >= self.config.detector_conf_threshold)
                    .collect();

                let mut observed = tracker.update(&detections);

                if let Some(classifier) = self.classifier.as_deref_mut() {
                    for obs in &mut observed {
                        if obs.label.is_some() {
                            continue;
                        }
                        if let Some((label, confidence)) = classifier.classify(&frame, &obs.rect)
                            && confidence >= self.config.label_conf_threshold
                        {
                            tracker.set_label(obs.id, label);
                            obs.label = tracker.label(obs.id);
                        }
                    }
                }

                let stats = counter.update(frame_idx, &observed);

                heatmap.decay();
                let centers: Vec<(f32, f32)> =
                    observed.iter().map(|o| o.center()).collect();
                heatmap.deposit(&centers);

                let annotated = renderer.compose(frame, &observed, &stats, line_y, &heatmap);
                sink.write(&annotated)?;
                frames_out += 1;
                frames_processed += 1;

                debug!(
                    frame = frame_idx,
                    tracked = observed.len(),
                    entered = stats.total_entered,
                    exited = stats.total_exited,
                    "frame processed"
                );
                if let Some(callback) = self.on_stats.as_deref_mut() {
                    callback(&stats);
                }
                last_annotated = Some(annotated);
                last_stats = stats;
            }

            next = source.next_frame()?;
        }

        if frames_out == 0 {
            return Err(PipelineError::EmptyOutput);
        }
        sink.finish()?;

        info!(
            frames_in = frame_idx,
            frames_processed, frames_out, "session complete"
        );
        Ok(SessionSummary {
            frames_in: frame_idx,
            frames_processed,
            frames_out,
            stats: last_stats,
        })
    }
}
