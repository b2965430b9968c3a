//! Coordinator tuning.

use std::time::Duration;

use crate::markers::ErrorMarkers;

/// Suppression window after a hard failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(60_000);

/// Upper bound on a single backend call.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub cooldown: Duration,
    pub backend_timeout: Duration,
    pub error_markers: ErrorMarkers,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            error_markers: ErrorMarkers::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn with_error_markers(mut self, markers: ErrorMarkers) -> Self {
        self.error_markers = markers;
        self
    }
}
