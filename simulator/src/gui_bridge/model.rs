use rehabcore::chart::{AxisTick, MetricChart};
use rehabcore::{ChartPoint, MetricsSnapshot, SessionCoordinator, SimState};
use serde::{Deserialize, Serialize};

const VALUE_TICKS: usize = 5;
const TIME_TICKS: usize = 4;

/// One chart lane as served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartSeries {
    pub title: String,
    pub unit: String,
    pub value_min: f32,
    pub value_max: f32,
    pub points: Vec<ChartPoint>,
    pub value_ticks: Vec<AxisTick>,
    pub time_ticks: Vec<AxisTick>,
}

impl ChartSeries {
    pub fn from_chart(chart: &MetricChart) -> Self {
        Self {
            title: chart.title.clone(),
            unit: chart.unit.clone(),
            value_min: chart.value_min,
            value_max: chart.value_max,
            points: chart.points().to_vec(),
            value_ticks: chart.value_ticks(VALUE_TICKS),
            time_ticks: chart.time_ticks(TIME_TICKS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub snapshot: MetricsSnapshot,
    pub state: SimState,
    pub profile_name: String,
    pub profile_key: String,
    pub speed: f32,
    pub frame_count: usize,
    pub progress: f32,
    pub anomalies_scheduled: usize,
    pub anomaly_onsets: usize,
    pub charts: Vec<ChartSeries>,
    pub status: String,
}

impl VisualizationModel {
    /// Reads everything the dashboard shows from `coordinator`. `status` is
    /// left empty; the bridge keeps the last one it was given.
    pub fn capture(coordinator: &SessionCoordinator) -> Self {
        let (profile_name, profile_key) = match coordinator.active_profile() {
            Some(profile) => (
                profile.name.to_string(),
                coordinator.profile_key().to_string(),
            ),
            None => (String::new(), String::new()),
        };
        let clock = coordinator.clock();
        Self {
            snapshot: coordinator.latest(),
            state: coordinator.state(),
            profile_name,
            profile_key,
            speed: clock.speed(),
            frame_count: clock.frame_count(),
            progress: clock.progress(),
            anomalies_scheduled: coordinator
                .session()
                .map_or(0, |session| session.anomalies().len()),
            anomaly_onsets: coordinator.counters().anomaly_onsets,
            charts: coordinator
                .charts()
                .lanes()
                .map(|(_, chart)| ChartSeries::from_chart(chart))
                .collect(),
            status: String::new(),
        }
    }
}
