use crate::chart::buffer::SeriesBuffer;
use crate::chart::projector::{AxisTick, ChartProjector, ProjectionRect};
use crate::prelude::{ChartPoint, ChartTarget};
use crate::session::{Channel, MetricsSnapshot};

pub const DEFAULT_CHART_CAPACITY: usize = 300;

/// Velocity value mapped to 1.0 when charts are normalized.
pub const VELOCITY_NORMALIZE_MAX: f32 = 2.0;

/// A displayed metric: declared value range plus its bounded series.
#[derive(Debug, Clone)]
pub struct MetricChart {
    pub title: String,
    pub unit: String,
    pub channel: Channel,
    pub value_min: f32,
    pub value_max: f32,
    buffer: SeriesBuffer,
}

impl MetricChart {
    pub fn new(channel: Channel, capacity: usize) -> Self {
        let (value_min, value_max) = match channel {
            Channel::Velocity => (0.0, VELOCITY_NORMALIZE_MAX),
            _ => (0.0, 100.0),
        };
        let unit = match channel {
            Channel::Velocity => "m/s",
            _ => "%",
        };
        Self {
            title: channel.label().to_string(),
            unit: unit.to_string(),
            channel,
            value_min,
            value_max,
            buffer: SeriesBuffer::with_capacity(capacity),
        }
    }

    /// Same chart with its range rescaled to [0, 1].
    pub fn normalized(mut self) -> Self {
        self.value_min = 0.0;
        self.value_max = 1.0;
        self.unit.clear();
        self
    }

    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut SeriesBuffer {
        &mut self.buffer
    }

    pub fn points(&self) -> &[ChartPoint] {
        self.buffer.points()
    }

    pub fn project(&self, rect: ProjectionRect) -> Vec<ChartPoint> {
        ChartProjector::project(self.buffer.points(), self.value_min, self.value_max, rect)
    }

    pub fn value_ticks(&self, count: usize) -> Vec<AxisTick> {
        ChartProjector::axis_ticks(self.value_min, self.value_max, count)
    }

    pub fn time_ticks(&self, count: usize) -> Vec<AxisTick> {
        ChartProjector::time_ticks(self.buffer.points(), count)
    }
}

impl ChartTarget for MetricChart {
    fn push(&mut self, x: f32, y: f32) {
        self.buffer.push(x, y);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Streams snapshot values into one chart target per channel.
#[derive(Debug, Clone)]
pub struct ChartFeeder<T: ChartTarget = MetricChart> {
    lanes: Vec<(Channel, T)>,
    normalize: bool,
}

impl<T: ChartTarget> ChartFeeder<T> {
    pub fn new(normalize: bool) -> Self {
        Self {
            lanes: Vec::new(),
            normalize,
        }
    }

    pub fn with_lane(mut self, channel: Channel, target: T) -> Self {
        self.lanes.push((channel, target));
        self
    }

    /// Pushes `(elapsed_seconds, value)` for every lane.
    pub fn feed(&mut self, snapshot: &MetricsSnapshot) {
        let x = snapshot.elapsed_seconds;
        for (channel, target) in &mut self.lanes {
            let value = scale(*channel, snapshot.value(*channel), self.normalize);
            target.push(x, value);
        }
    }

    pub fn clear_all(&mut self) {
        for (_, target) in &mut self.lanes {
            target.clear();
        }
    }

    pub fn lanes(&self) -> impl Iterator<Item = (Channel, &T)> {
        self.lanes.iter().map(|(channel, target)| (*channel, target))
    }

    pub fn lane(&self, channel: Channel) -> Option<&T> {
        self.lanes
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, target)| target)
    }
}

impl ChartFeeder<MetricChart> {
    /// Accuracy, velocity and fatigue charts; confidence is shown as a value
    /// only.
    pub fn dashboard(capacity: usize, normalize: bool) -> Self {
        [Channel::Accuracy, Channel::Velocity, Channel::Fatigue]
            .into_iter()
            .fold(Self::new(normalize), |feeder, channel| {
                let chart = MetricChart::new(channel, capacity);
                let chart = if normalize { chart.normalized() } else { chart };
                feeder.with_lane(channel, chart)
            })
    }
}

fn scale(channel: Channel, value: f32, normalize: bool) -> f32 {
    if !normalize {
        return value;
    }
    match channel {
        Channel::Velocity => value / VELOCITY_NORMALIZE_MAX,
        _ => value / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(elapsed: f32, accuracy: f32, velocity: f32) -> MetricsSnapshot {
        MetricsSnapshot {
            accuracy,
            velocity,
            fatigue: 40.0,
            confidence: 80.0,
            elapsed_seconds: elapsed,
            ..Default::default()
        }
    }

    #[test]
    fn feeder_pushes_elapsed_time_and_channel_value() {
        let mut feeder = ChartFeeder::new(false)
            .with_lane(Channel::Accuracy, SeriesBuffer::with_capacity(10))
            .with_lane(Channel::Velocity, SeriesBuffer::with_capacity(10));
        feeder.feed(&snapshot(0.5, 90.0, 1.2));
        feeder.feed(&snapshot(1.0, 89.0, 1.1));

        let accuracy = feeder.lane(Channel::Accuracy).unwrap();
        assert_eq!(
            accuracy.points(),
            &[ChartPoint::new(0.5, 90.0), ChartPoint::new(1.0, 89.0)]
        );
        assert_eq!(feeder.lane(Channel::Velocity).unwrap().len(), 2);
        assert!(feeder.lane(Channel::Fatigue).is_none());
    }

    #[test]
    fn normalized_feeder_scales_into_unit_range() {
        let mut feeder = ChartFeeder::dashboard(5, true);
        feeder.feed(&snapshot(0.0, 80.0, 1.5));

        let accuracy = feeder.lane(Channel::Accuracy).unwrap();
        assert_eq!(accuracy.points()[0].y, 0.8);
        assert_eq!(accuracy.value_max, 1.0);
        let velocity = feeder.lane(Channel::Velocity).unwrap();
        assert_eq!(velocity.points()[0].y, 0.75);
    }

    #[test]
    fn clear_all_empties_every_lane() {
        let mut feeder = ChartFeeder::dashboard(5, false);
        feeder.feed(&snapshot(0.0, 80.0, 1.5));
        feeder.clear_all();
        assert!(feeder.lanes().all(|(_, chart)| chart.points().is_empty()));
        assert_eq!(feeder.lanes().count(), 3);
    }

    #[test]
    fn metric_chart_projects_against_declared_range() {
        let mut chart = MetricChart::new(Channel::Accuracy, 10);
        chart.push(0.0, 0.0);
        chart.push(10.0, 100.0);
        let projected = chart.project(ProjectionRect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(projected[1], ChartPoint::new(50.0, 20.0));
        assert_eq!(chart.value_ticks(3)[1].value, 50.0);
        assert_eq!(chart.time_ticks(2)[1].value, 10.0);
    }
}
