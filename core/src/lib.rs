//! Core of the rehabilitation-session dashboard.
//!
//! Synthesizes four-channel sessions with scheduled anomalies, replays them
//! frame-accurately at variable speed, resolves anomaly windows while
//! streaming, and projects bounded chart series into screen space.

pub mod chart;
pub mod coordinator;
pub mod export;
pub mod generator;
pub mod math;
pub mod playback;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use coordinator::{ControlCommand, CoordinatorConfig, SessionCoordinator, SimState};
pub use prelude::{ChartPoint, ChartTarget, CoreError, CoreResult, FRAME_RATE, SESSION_FRAMES};
pub use session::{AnomalyEvent, Channel, MetricsSnapshot, Session};
