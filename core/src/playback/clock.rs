use crate::prelude::FRAME_RATE;
use crate::session::Session;

pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 2.0;

const SEEK_BIAS_FRAMES: f64 = 1e-6;

/// Maps accumulated wall-clock time to a frame index of the loaded session.
///
/// The frame never decreases while playing; only `stop`, `load` and `seek`
/// move it backwards.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    frame_count: usize,
    current_frame: usize,
    playing: bool,
    speed: f32,
    accumulated_seconds: f64,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            current_frame: 0,
            playing: false,
            speed: 1.0,
            accumulated_seconds: 0.0,
        }
    }

    pub fn load(&mut self, session: &Session) {
        self.frame_count = session.frame_count();
        self.current_frame = 0;
        self.accumulated_seconds = 0.0;
        self.playing = false;
    }

    /// Starts or resumes; ignored until a session is loaded.
    pub fn start(&mut self) {
        if self.frame_count > 0 {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.accumulated_seconds = 0.0;
        self.current_frame = 0;
    }

    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed = if multiplier.is_nan() {
            1.0
        } else {
            multiplier.clamp(MIN_SPEED, MAX_SPEED)
        };
    }

    /// Advances by `delta_seconds` of wall-clock time scaled by the speed.
    /// Reaching the last frame stops playback.
    pub fn advance(&mut self, delta_seconds: f32) -> usize {
        if !self.playing || self.frame_count == 0 {
            return self.current_frame;
        }

        self.accumulated_seconds += f64::from(delta_seconds.max(0.0)) * f64::from(self.speed);
        let frame = (self.accumulated_seconds * f64::from(FRAME_RATE)).floor() as usize;
        let last = self.frame_count - 1;
        self.current_frame = frame.min(last);

        if self.current_frame >= last {
            self.playing = false;
        }
        self.current_frame
    }

    /// Jumps to `frame`, clamped into the session. Playing state is kept.
    pub fn seek(&mut self, frame: usize) -> usize {
        if self.frame_count == 0 {
            return 0;
        }
        self.current_frame = frame.min(self.frame_count - 1);
        // nudged into the frame so floor() lands on it despite f64 rounding
        self.accumulated_seconds =
            (self.current_frame as f64 + SEEK_BIAS_FRAMES) / f64::from(FRAME_RATE);
        self.current_frame
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.current_frame as f32 / FRAME_RATE
    }

    /// Fraction of the session played, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.frame_count <= 1 {
            return 0.0;
        }
        self.current_frame as f32 / (self.frame_count - 1) as f32
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::SESSION_FRAMES;

    fn session(frames: usize) -> Session {
        let flat = vec![50.0; frames];
        Session::from_channels(
            "Clock",
            flat.clone(),
            vec![1.0; frames],
            flat.clone(),
            flat,
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn full_session_at_normal_speed_ends_on_last_frame() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(SESSION_FRAMES));
        clock.set_speed(1.0);
        clock.start();

        let mut previous = 0;
        for _ in 0..SESSION_FRAMES {
            let frame = clock.advance(1.0 / 30.0);
            assert!(frame >= previous);
            previous = frame;
        }

        assert_eq!(clock.current_frame(), SESSION_FRAMES - 1);
        assert!(!clock.is_playing());
    }

    #[test]
    fn advance_is_noop_unless_playing() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(100));
        assert_eq!(clock.advance(1.0), 0);

        clock.start();
        assert_eq!(clock.advance(0.5), 15);
        clock.pause();
        assert_eq!(clock.advance(10.0), 15);
    }

    #[test]
    fn pause_and_resume_neither_skip_nor_rewind() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(1000));
        clock.start();
        clock.advance(0.25);
        let before = clock.current_frame();
        clock.pause();
        clock.start();
        assert_eq!(clock.current_frame(), before);
        // 0.25 s + 0.25 s continue from the accumulated time
        assert_eq!(clock.advance(0.25), 15);
    }

    #[test]
    fn speed_is_clamped_and_scales_time() {
        let mut clock = PlaybackClock::new();
        clock.set_speed(5.0);
        assert_eq!(clock.speed(), MAX_SPEED);
        clock.set_speed(0.0);
        assert_eq!(clock.speed(), MIN_SPEED);

        clock.load(&session(1000));
        clock.set_speed(2.0);
        clock.start();
        assert_eq!(clock.advance(1.0), 60);
    }

    #[test]
    fn large_steps_clamp_to_last_frame_and_stop() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(50));
        clock.start();
        assert_eq!(clock.advance(100.0), 49);
        assert!(!clock.is_playing());
    }

    #[test]
    fn stop_and_load_reset_to_frame_zero() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(100));
        clock.start();
        clock.advance(1.0);
        clock.stop();
        assert_eq!(clock.current_frame(), 0);
        assert!(!clock.is_playing());

        clock.start();
        clock.advance(1.0);
        clock.load(&session(200));
        assert_eq!(clock.current_frame(), 0);
        assert_eq!(clock.frame_count(), 200);
    }

    #[test]
    fn start_without_session_is_ignored() {
        let mut clock = PlaybackClock::new();
        clock.start();
        assert!(!clock.is_playing());
        assert_eq!(clock.seek(10), 0);
    }

    #[test]
    fn seek_clamps_and_resumes_from_target() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(100));
        assert_eq!(clock.seek(500), 99);
        assert_eq!(clock.seek(30), 30);
        clock.start();
        assert_eq!(clock.advance(1.0), 60);
        assert!((clock.progress() - 60.0 / 99.0).abs() < 1e-6);
    }

    #[test]
    fn seek_lands_exactly_on_every_frame() {
        let mut clock = PlaybackClock::new();
        clock.load(&session(SESSION_FRAMES));
        for frame in [123, 245, 490, 8999] {
            clock.seek(frame);
            clock.start();
            assert_eq!(clock.advance(0.0), frame);
            clock.pause();
        }
    }
}
