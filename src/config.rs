//! Coordinator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default cap on tree depth (root is depth 0)
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default time a session may sit in `waiting` before it needs attention
pub const DEFAULT_WAITING_THRESHOLD: Duration = Duration::from_secs(10 * 60);

/// Configuration for the coordination core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Hard cap on tree depth. A spawn past the cap fails with
    /// `DepthExceeded`; it is never clamped.
    pub max_depth: u32,
    /// How long a session may self-report `waiting` before the
    /// attention aggregator surfaces it.
    pub waiting_threshold: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            waiting_threshold: DEFAULT_WAITING_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.waiting_threshold, Duration::from_secs(600));
    }
}
