use crate::session::Channel;
use serde::{Deserialize, Serialize};

/// Immutable view of the current frame, published once per tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub accuracy: f32,
    pub velocity: f32,
    pub fatigue: f32,
    pub confidence: f32,
    pub frame_index: usize,
    pub elapsed_seconds: f32,
    pub anomaly_active: bool,
    /// Empty whenever `anomaly_active` is false.
    pub anomaly_reason: String,
}

impl MetricsSnapshot {
    /// All-zero snapshot published after a reset.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn value(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Accuracy => self.accuracy,
            Channel::Velocity => self.velocity,
            Channel::Fatigue => self.fatigue,
            Channel::Confidence => self.confidence,
        }
    }
}
