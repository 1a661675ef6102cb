/// Track state enumeration for the identity lifecycle.
///
/// Tracks are born directly in `Tracked`. An unmatched frame moves a track to
/// `Lost`; a later match moves it back. Once `Removed` the identity is retired
/// for good and its id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Matched to a detection this frame (or just created)
    #[default]
    Tracked,
    /// Unmatched for one or more recent frames
    Lost,
    /// Retired after staying lost longer than `max_lost` frames
    Removed,
}
