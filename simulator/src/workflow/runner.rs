use crate::gui_bridge::bridge::GuiBridge;
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::{debug, info};
use rehabcore::math::StatsHelper;
use rehabcore::{ControlCommand, CoreError, SessionCoordinator, SimState};
use std::future::Future;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct WorkflowResult {
    pub profile_name: String,
    pub frame_count: usize,
    pub final_frame: usize,
    pub ticks: usize,
    pub anomalies_scheduled: usize,
    pub anomaly_onsets: usize,
    pub reasons_seen: Vec<String>,
    pub mean_accuracy: f32,
    pub fatigue_extent: Option<(f32, f32)>,
    pub export_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn coordinator(&self) -> SessionCoordinator {
        SessionCoordinator::new(self.config.to_coordinator_config())
    }

    /// Generates one session and plays it to the end with a fixed step of
    /// `1 / tick_hz` seconds, without waiting on the wall clock.
    pub fn execute(&self, export: bool) -> anyhow::Result<WorkflowResult> {
        let mut coordinator = self.coordinator();
        let (profile_name, frame_count, anomalies_scheduled) = {
            let session = coordinator.generate().context("generating session")?;
            (
                session.profile_name().to_string(),
                session.frame_count(),
                session.anomalies().len(),
            )
        };
        coordinator.start().context("starting playback")?;

        let step = 1.0 / self.config.effective_tick_hz();
        let mut accuracy = Vec::with_capacity(frame_count);
        let mut fatigue = Vec::with_capacity(frame_count);
        let mut reasons_seen: Vec<String> = Vec::new();
        let mut final_frame = 0;

        while coordinator.state() == SimState::Playing {
            let snapshot = coordinator.tick(step);
            accuracy.push(snapshot.accuracy);
            fatigue.push(snapshot.fatigue);
            if snapshot.anomaly_active && !reasons_seen.contains(&snapshot.anomaly_reason) {
                reasons_seen.push(snapshot.anomaly_reason.clone());
            }
            final_frame = snapshot.frame_index;
        }

        let export_path = if export {
            Some(
                coordinator
                    .export_to(&self.config.export_dir)
                    .context("exporting session csv")?,
            )
        } else {
            None
        };

        let counters = coordinator.counters();
        info!(
            "offline run of {} finished at frame {} after {} ticks",
            profile_name, final_frame, counters.ticks
        );

        Ok(WorkflowResult {
            profile_name,
            frame_count,
            final_frame,
            ticks: counters.ticks,
            anomalies_scheduled,
            anomaly_onsets: counters.anomaly_onsets,
            reasons_seen,
            mean_accuracy: StatsHelper::mean(&accuracy),
            fatigue_extent: StatsHelper::extent(&fatigue),
            export_path,
        })
    }

    /// Drives `coordinator` on the wall clock until `shutdown` resolves or
    /// every command sender is dropped. Each tick and each applied command
    /// republishes the model on `bridge`.
    pub async fn run_realtime<F>(
        &self,
        coordinator: &mut SessionCoordinator,
        bridge: &GuiBridge,
        mut commands: mpsc::Receiver<ControlCommand>,
        shutdown: F,
    ) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut interval = time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();
        tokio::pin!(shutdown);

        bridge.publish(&VisualizationModel::capture(coordinator))?;
        loop {
            tokio::select! {
                now = interval.tick() => {
                    let delta = now.saturating_duration_since(last).as_secs_f32();
                    last = now;
                    if coordinator.state() == SimState::Playing {
                        coordinator.tick(delta);
                        bridge.publish(&VisualizationModel::capture(coordinator))?;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("control channel closed");
                        break;
                    };
                    let status = self.apply(coordinator, command);
                    bridge.publish(&VisualizationModel::capture(coordinator))?;
                    bridge.publish_status(&status);
                }
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Applies one control command and returns the status line to show.
    /// Refused commands are reported, never propagated.
    pub fn apply(&self, coordinator: &mut SessionCoordinator, command: ControlCommand) -> String {
        match command {
            ControlCommand::Generate => match coordinator.generate() {
                Ok(session) => format!(
                    "Generated {} session with {} anomalies",
                    session.profile_name(),
                    session.anomalies().len()
                ),
                Err(CoreError::NoProfile) => "No model assigned".to_string(),
                Err(err) => format!("Generation failed: {err}"),
            },
            ControlCommand::NextProfile => match coordinator.next_profile() {
                Some(id) => format!("Profile {}: {}", coordinator.profile_key(), id.profile().name),
                None => "No model assigned".to_string(),
            },
            ControlCommand::SelectProfile { profile } => {
                if coordinator.select_profile(profile) {
                    format!("Profile {}: {}", coordinator.profile_key(), profile.profile().name)
                } else {
                    format!("Profile {profile} is not offered")
                }
            }
            ControlCommand::Start => match coordinator.start() {
                Ok(()) => "Playing".to_string(),
                Err(_) => "Please generate a session first".to_string(),
            },
            ControlCommand::Pause => {
                coordinator.pause();
                "Paused".to_string()
            }
            ControlCommand::Stop => {
                coordinator.stop();
                "Stopped".to_string()
            }
            ControlCommand::SetSpeed { speed } => {
                coordinator.set_speed(speed);
                format!("Speed {:.2}x", coordinator.clock().speed())
            }
            ControlCommand::Seek { frame } => {
                if coordinator.session().is_none() {
                    return "Please generate a session first".to_string();
                }
                format!("Moved to frame {}", coordinator.seek(frame))
            }
            ControlCommand::Export => match coordinator.export_to(&self.config.export_dir) {
                Ok(path) => format!("Session exported to {}", path.display()),
                Err(CoreError::NoSession) => "No session to export".to_string(),
                Err(err) => format!("Export failed: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehabcore::generator::ProfileId;
    use rehabcore::SESSION_FRAMES;

    fn seeded(profile: ProfileId) -> WorkflowConfig {
        WorkflowConfig::from_args(profile, Some(11), 1.0, 30.0)
    }

    #[test]
    fn runner_plays_session_to_the_end() {
        let runner = Runner::new(seeded(ProfileId::Baseline));
        let result = runner.execute(false).unwrap();
        assert_eq!(result.frame_count, SESSION_FRAMES);
        assert_eq!(result.final_frame, SESSION_FRAMES - 1);
        assert!(result.ticks >= SESSION_FRAMES - 1 && result.ticks <= SESSION_FRAMES);
        assert!(result.anomaly_onsets >= 1);
        assert!(result.anomaly_onsets <= result.anomalies_scheduled);
        assert!(!result.reasons_seen.is_empty());
        assert!(result.mean_accuracy > 80.0 && result.mean_accuracy < 95.0);
        let (lo, hi) = result.fatigue_extent.unwrap();
        assert!(lo <= hi);
        assert!(result.export_path.is_none());
    }

    #[test]
    fn runner_exports_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = seeded(ProfileId::Fatigued);
        cfg.speed = 2.0;
        cfg.export_dir = dir.path().to_path_buf();
        let result = Runner::new(cfg).execute(true).unwrap();
        let path = result.export_path.unwrap();
        assert!(path.starts_with(dir.path()));
        let csv = std::fs::read_to_string(path).unwrap();
        assert_eq!(csv.lines().count(), SESSION_FRAMES + 1);
    }

    #[test]
    fn apply_reports_refused_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = seeded(ProfileId::Baseline);
        cfg.export_dir = dir.path().to_path_buf();
        let runner = Runner::new(cfg);
        let mut coordinator = runner.coordinator();

        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::Start),
            "Please generate a session first"
        );
        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::Export),
            "No session to export"
        );
        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::Seek { frame: 10 }),
            "Please generate a session first"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn apply_drives_the_coordinator() {
        let runner = Runner::new(seeded(ProfileId::Baseline));
        let mut coordinator = runner.coordinator();

        let status = runner.apply(&mut coordinator, ControlCommand::Generate);
        assert!(status.starts_with("Generated Baseline Model session"));
        assert_eq!(runner.apply(&mut coordinator, ControlCommand::Start), "Playing");
        assert_eq!(coordinator.state(), SimState::Playing);
        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::SetSpeed { speed: 5.0 }),
            "Speed 2.00x"
        );
        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::Seek { frame: 20_000 }),
            format!("Moved to frame {}", SESSION_FRAMES - 1)
        );
        assert_eq!(
            runner.apply(&mut coordinator, ControlCommand::NextProfile),
            "Profile B: Fatigued Model"
        );
        assert_eq!(runner.apply(&mut coordinator, ControlCommand::Stop), "Stopped");
        assert_eq!(coordinator.clock().current_frame(), 0);
    }

    #[tokio::test]
    async fn realtime_loop_applies_queued_commands() {
        let runner = Runner::new(WorkflowConfig::from_args(
            ProfileId::HighPerformer,
            Some(3),
            1.0,
            200.0,
        ));
        let mut coordinator = runner.coordinator();
        let bridge = GuiBridge::new();
        let (tx, rx) = mpsc::channel(8);
        tx.send(ControlCommand::Generate).await.unwrap();
        tx.send(ControlCommand::Start).await.unwrap();
        tx.send(ControlCommand::SetSpeed { speed: 1.5 }).await.unwrap();
        drop(tx);

        runner
            .run_realtime(&mut coordinator, &bridge, rx, std::future::pending())
            .await
            .unwrap();

        assert_eq!(coordinator.state(), SimState::Playing);
        let model = bridge.snapshot();
        assert_eq!(model.status, "Speed 1.50x");
        assert_eq!(model.profile_name, "High Performer Model");
        assert_eq!(model.frame_count, SESSION_FRAMES);
    }

    #[tokio::test]
    async fn realtime_loop_stops_on_shutdown() {
        let runner = Runner::new(seeded(ProfileId::Baseline));
        let mut coordinator = runner.coordinator();
        let bridge = GuiBridge::new();
        let (_tx, rx) = mpsc::channel(1);

        runner
            .run_realtime(&mut coordinator, &bridge, rx, std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(coordinator.state(), SimState::Stopped);
        assert_eq!(bridge.snapshot().state, SimState::Stopped);
    }
}
