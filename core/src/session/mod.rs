//! Generated session data: four parallel metric channels plus the anomaly
//! schedule, immutable once built.

pub mod snapshot;

pub use snapshot::MetricsSnapshot;

use crate::prelude::{CoreError, CoreResult, FRAME_RATE};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One named metric series of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    Accuracy,
    Velocity,
    Fatigue,
    Confidence,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Accuracy,
        Channel::Velocity,
        Channel::Fatigue,
        Channel::Confidence,
    ];

    /// Row of the channel inside the session matrix.
    pub fn index(self) -> usize {
        match self {
            Channel::Accuracy => 0,
            Channel::Velocity => 1,
            Channel::Fatigue => 2,
            Channel::Confidence => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Accuracy => "Accuracy",
            Channel::Velocity => "Velocity",
            Channel::Fatigue => "Fatigue",
            Channel::Confidence => "Confidence",
        }
    }

    /// Valid numeric range every value of this channel is clamped into.
    pub fn range(self) -> (f32, f32) {
        match self {
            Channel::Velocity => (0.2, 3.0),
            _ => (0.0, 100.0),
        }
    }

    pub fn clamp(self, value: f32) -> f32 {
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }
}

/// A scheduled anomaly: the frame it centers on and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub frame: usize,
    pub reason: String,
}

impl AnomalyEvent {
    pub fn new(frame: usize, reason: impl Into<String>) -> Self {
        Self {
            frame,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    profile_name: String,
    frame_count: usize,
    channels: Array2<f32>,
    anomalies: Vec<AnomalyEvent>,
    created_at: OffsetDateTime,
}

impl Session {
    /// Builds a session from explicit channel arrays, validating that every
    /// channel has the same non-zero length and that the schedule is strictly
    /// increasing and in range.
    pub fn from_channels(
        profile_name: impl Into<String>,
        accuracy: Vec<f32>,
        velocity: Vec<f32>,
        fatigue: Vec<f32>,
        confidence: Vec<f32>,
        anomalies: Vec<AnomalyEvent>,
    ) -> CoreResult<Self> {
        let frame_count = accuracy.len();
        if frame_count == 0 {
            return Err(CoreError::InvalidSession("session has no frames".into()));
        }
        for (channel, values) in [
            (Channel::Velocity, &velocity),
            (Channel::Fatigue, &fatigue),
            (Channel::Confidence, &confidence),
        ] {
            if values.len() != frame_count {
                return Err(CoreError::InvalidSession(format!(
                    "{} has {} frames, expected {}",
                    channel.label(),
                    values.len(),
                    frame_count
                )));
            }
        }

        let mut flat = Vec::with_capacity(frame_count * Channel::ALL.len());
        flat.extend(accuracy);
        flat.extend(velocity);
        flat.extend(fatigue);
        flat.extend(confidence);
        let channels = Array2::from_shape_vec((Channel::ALL.len(), frame_count), flat)
            .map_err(|err| CoreError::InvalidSession(err.to_string()))?;

        Self::from_matrix(profile_name.into(), channels, anomalies)
    }

    pub(crate) fn from_matrix(
        profile_name: String,
        channels: Array2<f32>,
        anomalies: Vec<AnomalyEvent>,
    ) -> CoreResult<Self> {
        let frame_count = channels.ncols();
        if channels.nrows() != Channel::ALL.len() || frame_count == 0 {
            return Err(CoreError::InvalidSession(format!(
                "channel matrix shape {:?}",
                channels.shape()
            )));
        }
        validate_schedule(&anomalies, frame_count)?;

        Ok(Self {
            profile_name,
            frame_count,
            channels,
            anomalies,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn duration_seconds(&self) -> f32 {
        self.frame_count as f32 / FRAME_RATE
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn anomalies(&self) -> &[AnomalyEvent] {
        &self.anomalies
    }

    pub fn channel(&self, channel: Channel) -> ArrayView1<'_, f32> {
        self.channels.row(channel.index())
    }

    /// Channel value at `frame`; frames past the end read the last frame.
    pub fn value(&self, channel: Channel, frame: usize) -> f32 {
        self.channels[[channel.index(), frame.min(self.frame_count - 1)]]
    }
}

fn validate_schedule(anomalies: &[AnomalyEvent], frame_count: usize) -> CoreResult<()> {
    let mut previous: Option<usize> = None;
    for event in anomalies {
        if event.frame >= frame_count {
            return Err(CoreError::InvalidSession(format!(
                "anomaly at frame {} outside {} frames",
                event.frame, frame_count
            )));
        }
        if previous.is_some_and(|prev| event.frame <= prev) {
            return Err(CoreError::InvalidSession(format!(
                "anomaly schedule not increasing at frame {}",
                event.frame
            )));
        }
        previous = Some(event.frame);
    }
    Ok(())
}
