//! Task bridge configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens to tasks still queued when the bridge shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Discard remaining tasks without running them
    #[default]
    Drop,
    /// Run remaining tasks synchronously on the shutting-down thread
    Drain,
}

/// Task bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Soft budget for one engine pump slice (milliseconds)
    pub pump_budget_ms: u64,

    /// Upper bound on tasks drained per host tick
    pub max_tasks_per_tick: usize,

    /// Policy applied to pending tasks at shutdown
    pub shutdown_policy: ShutdownPolicy,

    /// Debug-assert that draining and pumping happen on the UI thread
    pub assert_ui_thread: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            pump_budget_ms: 10,
            max_tasks_per_tick: 64,
            shutdown_policy: ShutdownPolicy::Drop,
            assert_ui_thread: true,
        }
    }
}

impl BridgeConfig {
    /// Pump budget as a duration.
    pub fn pump_budget(&self) -> Duration {
        Duration::from_millis(self.pump_budget_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tasks_per_tick == 0 {
            return Err(ConfigError::NoTasksPerTick);
        }
        if self.pump_budget_ms > 1000 {
            return Err(ConfigError::PumpBudgetTooLarge(self.pump_budget_ms));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("max_tasks_per_tick must be at least 1")]
    NoTasksPerTick,

    #[error("Pump budget of {0}ms exceeds one second")]
    PumpBudgetTooLarge(u64),
}
