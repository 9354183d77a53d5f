//! Bounded chart series and their projection into screen space.

pub mod buffer;
pub mod feeder;
pub mod projector;

pub use buffer::SeriesBuffer;
pub use feeder::{ChartFeeder, MetricChart, DEFAULT_CHART_CAPACITY, VELOCITY_NORMALIZE_MAX};
pub use projector::{AxisTick, ChartProjector, ProjectionRect};
