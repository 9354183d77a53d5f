use std::sync::Mutex;

/// Per-session playback counters, shareable by reference.
pub struct PlaybackMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCounters {
    pub ticks: usize,
    pub anomaly_onsets: usize,
    pub notices: usize,
}

struct Counters {
    counters: PlaybackCounters,
    anomaly_active: bool,
}

impl PlaybackMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters {
                counters: PlaybackCounters::default(),
                anomaly_active: false,
            }),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.counters.ticks += 1;
        }
    }

    /// Feeds the current anomaly flag; returns true on an inactive-to-active
    /// transition, which is counted as one onset.
    pub fn record_anomaly_state(&self, active: bool) -> bool {
        if let Ok(mut inner) = self.inner.lock() {
            let onset = active && !inner.anomaly_active;
            if onset {
                inner.counters.anomaly_onsets += 1;
            }
            inner.anomaly_active = active;
            onset
        } else {
            false
        }
    }

    /// Forgets the last anomaly flag, so the next active state counts as an
    /// onset. Used when playback jumps.
    pub fn clear_anomaly_state(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.anomaly_active = false;
        }
    }

    pub fn record_notice(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.counters.notices += 1;
        }
    }

    /// Clears tick and onset counters; notices survive session resets.
    pub fn reset_session(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.counters.ticks = 0;
            inner.counters.anomaly_onsets = 0;
            inner.anomaly_active = false;
        }
    }

    pub fn snapshot(&self) -> PlaybackCounters {
        if let Ok(inner) = self.inner.lock() {
            inner.counters
        } else {
            PlaybackCounters::default()
        }
    }
}

impl Default for PlaybackMetrics {
    fn default() -> Self {
        Self::new()
    }
}
