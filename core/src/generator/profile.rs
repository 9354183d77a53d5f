use crate::session::Channel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;

/// Identifier of a built-in session profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileId {
    Baseline,
    Fatigued,
    HighPerformer,
}

impl ProfileId {
    pub const ALL: [ProfileId; 3] = [
        ProfileId::Baseline,
        ProfileId::Fatigued,
        ProfileId::HighPerformer,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ProfileId::Baseline => "baseline",
            ProfileId::Fatigued => "fatigued",
            ProfileId::HighPerformer => "high-performer",
        }
    }

    pub fn profile(self) -> Profile {
        match self {
            ProfileId::Baseline => Profile {
                id: self,
                name: "Baseline Model",
                curves: [(92.0, 84.0), (1.25, 1.0), (12.0, 55.0), (92.0, 78.0)],
                impact: ImpactSpec {
                    severity: 0.5,
                    half_window: 15,
                    deltas: [-8.0, -0.18, 10.0, -6.0],
                },
                schedule: SchedulePolicy::Spaced {
                    count: 2..=4,
                    start_frame: 900,
                    spacing: 150..300,
                    tail_margin: 120,
                },
                reasons: &[
                    "Accuracy dip + mild fatigue spike",
                    "Slight form deviation detected",
                    "Momentary concentration lapse",
                ],
            },
            ProfileId::Fatigued => Profile {
                id: self,
                name: "Fatigued Model",
                curves: [(88.0, 70.0), (1.05, 0.65), (25.0, 90.0), (88.0, 60.0)],
                impact: ImpactSpec {
                    severity: 0.85,
                    half_window: 12,
                    deltas: [-14.0, -0.30, 18.0, -10.0],
                },
                schedule: SchedulePolicy::Clustered {
                    count: 6..=10,
                    start_frame: 0,
                    step: 15..21,
                    window_end: 150,
                    tail_margin: 120,
                },
                reasons: &[
                    "Severe fatigue spike + accuracy drop",
                    "Energy depletion detected",
                    "Form breakdown due to exhaustion",
                    "Critical fatigue threshold reached",
                ],
            },
            ProfileId::HighPerformer => Profile {
                id: self,
                name: "High Performer Model",
                curves: [(94.0, 97.0), (1.20, 1.35), (8.0, 30.0), (94.0, 98.0)],
                impact: ImpactSpec {
                    severity: 0.30,
                    half_window: 15,
                    deltas: [-5.0, -0.10, 6.0, -4.0],
                },
                schedule: SchedulePolicy::Paired {
                    first: 1800..2400,
                    min_gap: 600,
                    tail_margin: 180,
                },
                reasons: &["Minor technique drift", "Slight posture adjustment needed"],
            },
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProfileId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "baseline" | "a" => Ok(ProfileId::Baseline),
            "fatigued" | "b" => Ok(ProfileId::Fatigued),
            "high-performer" | "high_performer" | "c" => Ok(ProfileId::HighPerformer),
            other => Err(format!("unknown profile '{other}'")),
        }
    }
}

/// Per-event perturbation applied around every scheduled anomaly.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSpec {
    pub severity: f32,
    /// Frames either side of the event that receive a share of the impact.
    pub half_window: usize,
    /// Signed peak delta per channel, indexed by [`Channel::index`].
    pub deltas: [f32; 4],
}

/// How a profile places its anomaly events along the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulePolicy {
    /// Each event lands `spacing` frames after the previous one, the first
    /// measured from `start_frame`.
    Spaced {
        count: RangeInclusive<usize>,
        start_frame: usize,
        spacing: Range<usize>,
        tail_margin: usize,
    },
    /// Event `n` lands at `start_frame + n * step`, inside an early window.
    Clustered {
        count: RangeInclusive<usize>,
        start_frame: usize,
        step: Range<usize>,
        window_end: usize,
        tail_margin: usize,
    },
    /// Exactly two events, at least `min_gap` frames apart; reasons are
    /// taken in slot order.
    Paired {
        first: Range<usize>,
        min_gap: usize,
        tail_margin: usize,
    },
}

/// Complete parameter set for one generated scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: &'static str,
    /// (start, end) of the linear base curve per channel.
    pub curves: [(f32, f32); 4],
    pub impact: ImpactSpec,
    pub schedule: SchedulePolicy,
    pub reasons: &'static [&'static str],
}

impl Profile {
    pub fn curve(&self, channel: Channel) -> (f32, f32) {
        self.curves[channel.index()]
    }
}
