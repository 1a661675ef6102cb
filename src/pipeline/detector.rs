//! Traits for the external detection and classification backends.

use image::RgbImage;

use crate::tracker::{Detection, Label, Rect};

/// Trait for object detection inference backends.
///
/// Implement this to connect any detection model to the pipeline. The
/// pipeline treats detector latency and false negatives/positives as given;
/// a per-frame `Err` is degraded to "no detections this frame" rather than
/// aborting the session.
///
/// # Example
///
/// ```
/// use crowdflow_rs::{Detection, DetectorAdapter};
/// use image::RgbImage;
///
/// struct FixedDetector;
///
/// impl DetectorAdapter for FixedDetector {
///     type Error = std::convert::Infallible;
///
///     fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Detection>, Self::Error> {
///         Ok(vec![Detection::new(10.0, 10.0, 50.0, 90.0, 0.9)])
///     }
/// }
/// ```
pub trait DetectorAdapter {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on a decoded frame and return detections.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>, Self::Error>;
}

/// Secondary per-object classifier for tracks the detector left unlabeled.
///
/// The pipeline crops nothing itself; implementations receive the full frame
/// plus the track's box and may sample whatever region they need. Returning
/// `None` leaves the track unlabeled for this frame.
pub trait LabelClassifier {
    /// Classify the object inside `rect`, returning a label and confidence.
    fn classify(&mut self, frame: &RgbImage, rect: &Rect) -> Option<(Label, f32)>;
}

/// A classifier that never produces a label, for pipelines where the
/// detector's own classes are the only label source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl LabelClassifier for NoopClassifier {
    fn classify(&mut self, _frame: &RgbImage, _rect: &Rect) -> Option<(Label, f32)> {
        None
    }
}
