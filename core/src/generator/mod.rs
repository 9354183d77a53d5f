//! Procedural session synthesis: deterministic base curves per profile,
//! a randomized anomaly schedule, and triangular anomaly impacts.

pub mod impact;
pub mod profile;
pub mod schedule;
pub mod selector;

pub use profile::{ImpactSpec, Profile, ProfileId, SchedulePolicy};
pub use selector::ProfileSelector;

use crate::math::InterpHelper;
use crate::prelude::{CoreResult, SESSION_FRAMES};
use crate::session::{Channel, Session};
use crate::telemetry::EventLog;
use ndarray::Array2;
use rand::Rng;

pub struct SessionGenerator {
    profile: Profile,
    frame_count: usize,
    logger: EventLog,
}

impl SessionGenerator {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            frame_count: SESSION_FRAMES,
            logger: EventLog::new("generator"),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Builds a complete session. Only the schedule draws from `rng`; the
    /// base curves depend on the profile alone.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CoreResult<Session> {
        let mut channels = self.base_curves();
        let anomalies = schedule::build_schedule(&self.profile, self.frame_count, rng);

        for event in &anomalies {
            impact::apply_impact(&mut channels, event.frame, &self.profile.impact);
        }

        self.logger.record(&format!(
            "generated '{}' with {} anomalies",
            self.profile.name,
            anomalies.len()
        ));

        Session::from_matrix(self.profile.name.to_string(), channels, anomalies)
    }

    fn base_curves(&self) -> Array2<f32> {
        let denominator = self.frame_count.saturating_sub(1).max(1) as f32;
        Array2::from_shape_fn((Channel::ALL.len(), self.frame_count), |(row, i)| {
            let (start, end) = self.profile.curves[row];
            InterpHelper::lerp(start, end, i as f32 / denominator)
        })
    }
}

/// Generates a session for a built-in profile.
pub fn generate<R: Rng + ?Sized>(profile: ProfileId, rng: &mut R) -> CoreResult<Session> {
    SessionGenerator::new(profile.profile()).generate(rng)
}
