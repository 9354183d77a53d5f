/// Playback and sampling rate of every generated session.
pub const FRAME_RATE: f32 = 30.0;

/// Number of frames in every generated session (five minutes at 30 fps).
pub const SESSION_FRAMES: usize = 9000;

/// Common error type for the session core.
///
/// None of these are fatal: callers surface them as notices and the
/// coordinator keeps its previous state.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("no session profile is assigned")]
    NoProfile,
    #[error("no session is loaded")]
    NoSession,
    #[error("invalid session: {0}")]
    InvalidSession(String),
    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),
    #[error("timestamp formatting failed: {0}")]
    Timestamp(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// A two-dimensional sample, used both for data-domain chart points and for
/// projected screen-space points.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ChartPoint {
    pub x: f32,
    pub y: f32,
}

impl ChartPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Anything a chart feeder can stream samples into.
pub trait ChartTarget {
    fn push(&mut self, x: f32, y: f32);
    fn clear(&mut self);
}
