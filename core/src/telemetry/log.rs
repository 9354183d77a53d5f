use log::{debug, info, warn};

/// Component-tagged logger held by long-lived core objects.
#[derive(Debug, Clone)]
pub struct EventLog {
    component: &'static str,
}

impl EventLog {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }

    /// Non-fatal condition that the presentation layer shows as a notice.
    pub fn notice(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new("core")
    }
}
