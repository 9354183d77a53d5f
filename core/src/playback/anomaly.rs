use crate::session::AnomalyEvent;

/// Frames either side of a scheduled event that count as "inside" it during
/// playback. Deliberately separate from the generator's impact half-window.
pub const MATCH_HALF_WINDOW: usize = 10;

/// Position in an anomaly schedule; only moves forward during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnomalyCursor {
    pub next_event_index: usize,
}

impl AnomalyCursor {
    pub fn reset(&mut self) {
        self.next_event_index = 0;
    }
}

/// Result of resolving one frame against the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnomalyState {
    pub active: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Copy)]
pub struct AnomalyWindowMatcher {
    half_window: usize,
}

impl AnomalyWindowMatcher {
    pub fn new(half_window: usize) -> Self {
        Self { half_window }
    }

    pub fn half_window(&self) -> usize {
        self.half_window
    }

    /// Checks `frame` against the event under the cursor. Once the frame is
    /// past that event's window the cursor moves on by exactly one event.
    pub fn resolve(
        &self,
        frame: usize,
        schedule: &[AnomalyEvent],
        cursor: &mut AnomalyCursor,
    ) -> AnomalyState {
        let Some(event) = schedule.get(cursor.next_event_index) else {
            return AnomalyState::default();
        };

        let delta = frame as i64 - event.frame as i64;
        let half = self.half_window as i64;

        let state = if delta.abs() <= half {
            AnomalyState {
                active: true,
                reason: event.reason.clone(),
            }
        } else {
            AnomalyState::default()
        };

        if delta > half {
            cursor.next_event_index += 1;
        }
        state
    }

    /// Cursor for a playback position reached by seeking: the first event
    /// whose window has not fully passed `frame`.
    pub fn reposition(&self, frame: usize, schedule: &[AnomalyEvent]) -> AnomalyCursor {
        AnomalyCursor {
            next_event_index: schedule
                .partition_point(|event| event.frame + self.half_window < frame),
        }
    }
}

impl Default for AnomalyWindowMatcher {
    fn default() -> Self {
        Self::new(MATCH_HALF_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> Vec<AnomalyEvent> {
        vec![AnomalyEvent::new(100, "r1"), AnomalyEvent::new(200, "r2")]
    }

    #[test]
    fn forward_sweep_is_active_exactly_inside_windows() {
        let matcher = AnomalyWindowMatcher::default();
        let schedule = schedule();
        let mut cursor = AnomalyCursor::default();

        for frame in 0..=300 {
            let state = matcher.resolve(frame, &schedule, &mut cursor);
            let expected = (90..=110).contains(&frame) || (190..=210).contains(&frame);
            assert_eq!(state.active, expected, "frame {frame}");
            if (90..=110).contains(&frame) {
                assert_eq!(state.reason, "r1");
            } else if (190..=210).contains(&frame) {
                assert_eq!(state.reason, "r2");
            } else {
                assert!(state.reason.is_empty());
            }
        }
        assert_eq!(cursor.next_event_index, 2);
    }

    #[test]
    fn cursor_advances_one_event_per_call_on_large_jumps() {
        let matcher = AnomalyWindowMatcher::default();
        let schedule = schedule();
        let mut cursor = AnomalyCursor::default();

        let state = matcher.resolve(500, &schedule, &mut cursor);
        assert!(!state.active);
        assert_eq!(cursor.next_event_index, 1);

        matcher.resolve(500, &schedule, &mut cursor);
        assert_eq!(cursor.next_event_index, 2);

        let state = matcher.resolve(500, &schedule, &mut cursor);
        assert_eq!(state, AnomalyState::default());
        assert_eq!(cursor.next_event_index, 2);
    }

    #[test]
    fn frames_before_the_window_leave_cursor_alone() {
        let matcher = AnomalyWindowMatcher::default();
        let mut cursor = AnomalyCursor::default();
        let state = matcher.resolve(89, &schedule(), &mut cursor);
        assert!(!state.active);
        assert_eq!(cursor.next_event_index, 0);
    }

    #[test]
    fn empty_schedule_is_never_active() {
        let matcher = AnomalyWindowMatcher::default();
        let mut cursor = AnomalyCursor::default();
        assert!(!matcher.resolve(0, &[], &mut cursor).active);
    }

    #[test]
    fn reposition_finds_first_unpassed_event() {
        let matcher = AnomalyWindowMatcher::default();
        let schedule = schedule();
        assert_eq!(matcher.reposition(0, &schedule).next_event_index, 0);
        assert_eq!(matcher.reposition(110, &schedule).next_event_index, 0);
        assert_eq!(matcher.reposition(111, &schedule).next_event_index, 1);
        assert_eq!(matcher.reposition(205, &schedule).next_event_index, 1);
        assert_eq!(matcher.reposition(9000, &schedule).next_event_index, 2);
    }

    #[test]
    fn reposition_then_resolve_matches_forward_sweep() {
        let matcher = AnomalyWindowMatcher::default();
        let schedule = schedule();
        let mut cursor = matcher.reposition(195, &schedule);
        let state = matcher.resolve(195, &schedule, &mut cursor);
        assert!(state.active);
        assert_eq!(state.reason, "r2");
    }
}
