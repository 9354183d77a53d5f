//! Single owner of the active session and all per-session playback state.
//!
//! Every mutation goes through `&mut self`, so loading, stopping and seeking
//! reset the clock, the anomaly cursor and the chart buffers together before
//! the next tick can observe them. Consumers receive snapshots through a
//! watch channel and never hand the coordinator a reference back.

use crate::chart::{ChartFeeder, MetricChart, DEFAULT_CHART_CAPACITY};
use crate::export;
use crate::generator::{Profile, ProfileId, ProfileSelector, SessionGenerator};
use crate::playback::{
    AnomalyCursor, AnomalyState, AnomalyWindowMatcher, PlaybackClock, MATCH_HALF_WINDOW,
};
use crate::prelude::{CoreError, CoreResult, FRAME_RATE};
use crate::session::{Channel, MetricsSnapshot, Session};
use crate::telemetry::{EventLog, PlaybackCounters, PlaybackMetrics};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Playback control requested by a presentation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum ControlCommand {
    Generate,
    NextProfile,
    SelectProfile { profile: ProfileId },
    Start,
    Pause,
    Stop,
    SetSpeed { speed: f32 },
    Seek { frame: usize },
    Export,
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Profiles offered to the selector, in cycling order.
    pub profiles: Vec<ProfileId>,
    pub initial_profile: Option<ProfileId>,
    /// Seed for the schedule randomness; `None` draws from entropy.
    pub seed: Option<u64>,
    pub speed: f32,
    pub chart_capacity: usize,
    pub normalize_charts: bool,
    pub match_half_window: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            profiles: ProfileId::ALL.to_vec(),
            initial_profile: None,
            seed: None,
            speed: 1.0,
            chart_capacity: DEFAULT_CHART_CAPACITY,
            normalize_charts: false,
            match_half_window: MATCH_HALF_WINDOW,
        }
    }
}

pub struct SessionCoordinator {
    selector: ProfileSelector,
    session: Option<Session>,
    clock: PlaybackClock,
    matcher: AnomalyWindowMatcher,
    cursor: AnomalyCursor,
    charts: ChartFeeder<MetricChart>,
    state: SimState,
    publisher: watch::Sender<MetricsSnapshot>,
    metrics: PlaybackMetrics,
    rng: StdRng,
    logger: EventLog,
}

impl SessionCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        let mut selector = ProfileSelector::new(config.profiles);
        if let Some(initial) = config.initial_profile {
            selector.select(initial);
        }
        let mut clock = PlaybackClock::new();
        clock.set_speed(config.speed);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (publisher, _) = watch::channel(MetricsSnapshot::idle());

        Self {
            selector,
            session: None,
            clock,
            matcher: AnomalyWindowMatcher::new(config.match_half_window),
            cursor: AnomalyCursor::default(),
            charts: ChartFeeder::dashboard(config.chart_capacity, config.normalize_charts),
            state: SimState::Stopped,
            publisher,
            metrics: PlaybackMetrics::new(),
            rng,
            logger: EventLog::new("coordinator"),
        }
    }

    /// New receiver of published snapshots; it starts at the latest one.
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.publisher.subscribe()
    }

    pub fn latest(&self) -> MetricsSnapshot {
        self.publisher.borrow().clone()
    }

    /// Generates a session for the active profile and loads it. Without a
    /// profile nothing changes and `NoProfile` is returned.
    pub fn generate(&mut self) -> CoreResult<&Session> {
        let Some(profile) = self.selector.active() else {
            return Err(self.notice(CoreError::NoProfile));
        };
        let session = SessionGenerator::new(profile).generate(&mut self.rng)?;
        Ok(self.load(session))
    }

    /// Replaces the session wholesale and resets clock, cursor, charts and
    /// counters before returning.
    pub fn load(&mut self, session: Session) -> &Session {
        self.clock.load(&session);
        self.cursor.reset();
        self.charts.clear_all();
        self.metrics.reset_session();
        self.state = SimState::Stopped;
        self.publisher.send_replace(MetricsSnapshot::idle());
        self.logger.record(&format!(
            "loaded '{}' ({} frames, {} anomalies)",
            session.profile_name(),
            session.frame_count(),
            session.anomalies().len()
        ));
        self.session.insert(session)
    }

    pub fn start(&mut self) -> CoreResult<()> {
        if self.session.is_none() {
            return Err(self.notice(CoreError::NoSession));
        }
        if self.state == SimState::Playing {
            return Ok(());
        }
        self.clock.start();
        if self.clock.is_playing() {
            self.state = SimState::Playing;
            self.logger.record("playback started");
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != SimState::Playing {
            return;
        }
        self.clock.pause();
        self.state = SimState::Paused;
        self.logger.record(&format!(
            "playback paused at frame {}",
            self.clock.current_frame()
        ));
    }

    /// Halts playback and resets the frame, the cursor and the charts
    /// together, then publishes an idle snapshot.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.cursor.reset();
        self.charts.clear_all();
        self.metrics.reset_session();
        self.state = SimState::Stopped;
        self.publisher.send_replace(MetricsSnapshot::idle());
        self.logger.record("session reset");
    }

    pub fn set_speed(&mut self, multiplier: f32) {
        self.clock.set_speed(multiplier);
        self.logger
            .trace(&format!("speed set to {:.2}x", self.clock.speed()));
    }

    /// Moves playback to `frame` (clamped) and repositions the anomaly
    /// cursor for it. The snapshot for the target is published at once and
    /// the charts restart from the new position.
    pub fn seek(&mut self, frame: usize) -> usize {
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        let target = self.clock.seek(frame);
        self.cursor = self.matcher.reposition(target, session.anomalies());
        // resolved on a copy so the next tick starts from the repositioned cursor
        let mut lookahead = self.cursor;
        let anomaly = self.matcher.resolve(target, session.anomalies(), &mut lookahead);
        let snapshot = snapshot_at(session, target, anomaly);

        self.metrics.clear_anomaly_state();
        self.charts.clear_all();
        self.publisher.send_replace(snapshot);
        self.logger.record(&format!("seek to frame {target}"));
        target
    }

    /// One bounded unit of playback work. While playing this advances the
    /// clock, resolves the anomaly window, publishes the snapshot and feeds
    /// the charts; otherwise it returns the latest snapshot unchanged.
    pub fn tick(&mut self, delta_seconds: f32) -> MetricsSnapshot {
        let Some(session) = self.session.as_ref() else {
            return self.latest();
        };
        if self.state != SimState::Playing {
            return self.latest();
        }

        let frame = self.clock.advance(delta_seconds);
        let anomaly = self
            .matcher
            .resolve(frame, session.anomalies(), &mut self.cursor);

        let snapshot = snapshot_at(session, frame, anomaly);

        self.metrics.record_tick();
        if self.metrics.record_anomaly_state(snapshot.anomaly_active) {
            self.logger.record(&format!(
                "anomaly at frame {}: {}",
                frame, snapshot.anomaly_reason
            ));
        }

        self.publisher.send_replace(snapshot.clone());
        self.charts.feed(&snapshot);

        if !self.clock.is_playing() {
            self.state = SimState::Stopped;
            self.logger
                .record(&format!("end of session at frame {frame}"));
        }
        snapshot
    }

    pub fn export_csv(&self) -> CoreResult<String> {
        match self.session.as_ref() {
            Some(session) => Ok(export::session_to_csv(session)),
            None => Err(self.notice(CoreError::NoSession)),
        }
    }

    /// Writes the session CSV into `dir`. Nothing is written without a
    /// session.
    pub fn export_to(&self, dir: &Path) -> CoreResult<PathBuf> {
        let Some(session) = self.session.as_ref() else {
            return Err(self.notice(CoreError::NoSession));
        };
        let path = export::write_export(session, dir).map_err(|err| self.notice(err))?;
        self.logger
            .record(&format!("session exported to {}", path.display()));
        Ok(path)
    }

    pub fn next_profile(&mut self) -> Option<ProfileId> {
        let next = self.selector.cycle();
        if let Some(id) = next {
            self.logger.record(&format!("switched to {id}"));
        }
        next
    }

    pub fn select_profile(&mut self, id: ProfileId) -> bool {
        self.selector.select(id)
    }

    pub fn active_profile(&self) -> Option<Profile> {
        self.selector.active()
    }

    pub fn profile_key(&self) -> char {
        self.selector.key()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn cursor(&self) -> AnomalyCursor {
        self.cursor
    }

    pub fn charts(&self) -> &ChartFeeder<MetricChart> {
        &self.charts
    }

    pub fn counters(&self) -> PlaybackCounters {
        self.metrics.snapshot()
    }

    fn notice(&self, err: CoreError) -> CoreError {
        self.metrics.record_notice();
        self.logger.notice(&err.to_string());
        err
    }
}

impl Default for SessionCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

fn snapshot_at(session: &Session, frame: usize, anomaly: AnomalyState) -> MetricsSnapshot {
    MetricsSnapshot {
        accuracy: session.value(Channel::Accuracy, frame),
        velocity: session.value(Channel::Velocity, frame),
        fatigue: session.value(Channel::Fatigue, frame),
        confidence: session.value(Channel::Confidence, frame),
        frame_index: frame,
        elapsed_seconds: frame as f32 / FRAME_RATE,
        anomaly_active: anomaly.active,
        anomaly_reason: anomaly.reason,
    }
}
