mod line_cross;
mod presence;
mod stats;

pub use line_cross::LineCrossCounter;
pub use presence::PresenceCounter;
pub use stats::{CountingStrategy, FrameStats};
