mod iou_tracker;
mod rect;
mod track;
mod track_state;

pub use iou_tracker::{Detection, IouTracker, TrackerConfig};
pub use rect::Rect;
pub use track::{Label, Track, TrackObservation};
pub use track_state::TrackState;
