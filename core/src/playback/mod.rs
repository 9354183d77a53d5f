pub mod anomaly;
pub mod clock;

pub use anomaly::{AnomalyCursor, AnomalyState, AnomalyWindowMatcher, MATCH_HALF_WINDOW};
pub use clock::{PlaybackClock, MAX_SPEED, MIN_SPEED};
