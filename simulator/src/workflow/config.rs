use anyhow::Context;
use rehabcore::chart::DEFAULT_CHART_CAPACITY;
use rehabcore::generator::ProfileId;
use rehabcore::CoordinatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lowest tick rate the real-time loop accepts.
const MIN_TICK_HZ: f32 = 1.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub profile: ProfileId,
    pub seed: Option<u64>,
    pub speed: f32,
    pub tick_hz: f32,
    pub chart_capacity: usize,
    pub normalize_charts: bool,
    pub export_dir: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            profile: ProfileId::Baseline,
            seed: None,
            speed: 1.0,
            tick_hz: 30.0,
            chart_capacity: DEFAULT_CHART_CAPACITY,
            normalize_charts: false,
            export_dir: PathBuf::from("tools/data/exports"),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(profile: ProfileId, seed: Option<u64>, speed: f32, tick_hz: f32) -> Self {
        Self {
            profile,
            seed,
            speed,
            tick_hz,
            ..Self::default()
        }
    }

    /// Wall-clock period between two coordinator ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.effective_tick_hz())
    }

    pub fn effective_tick_hz(&self) -> f32 {
        if self.tick_hz.is_finite() {
            self.tick_hz.max(MIN_TICK_HZ)
        } else {
            MIN_TICK_HZ
        }
    }

    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            initial_profile: Some(self.profile),
            seed: self.seed,
            speed: self.speed,
            chart_capacity: self.chart_capacity.max(1),
            normalize_charts: self.normalize_charts,
            ..CoordinatorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_coordinator_config() {
        let cfg = WorkflowConfig::from_args(ProfileId::Fatigued, Some(7), 1.5, 30.0);
        let coordinator = cfg.to_coordinator_config();
        assert_eq!(coordinator.initial_profile, Some(ProfileId::Fatigued));
        assert_eq!(coordinator.seed, Some(7));
        assert_eq!(coordinator.chart_capacity, DEFAULT_CHART_CAPACITY);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"profile: high-performer\nseed: 42\nspeed: 2.0\nnormalize_charts: true\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.profile, ProfileId::HighPerformer);
        assert_eq!(cfg.seed, Some(42));
        assert!(cfg.normalize_charts);
        assert_eq!(cfg.tick_hz, 30.0);
    }

    #[test]
    fn config_load_rejects_unknown_profile() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"profile: sprinter\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn tick_interval_has_a_floor() {
        let mut cfg = WorkflowConfig::default();
        assert!((cfg.tick_interval().as_secs_f32() - 1.0 / 30.0).abs() < 1e-6);
        cfg.tick_hz = 0.0;
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
        cfg.tick_hz = f32::NAN;
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
    }
}
