//! Logging
//!
//! Log levels used to gate per-component notification output. Emission goes
//! through `tracing`.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Whether a message at `self` passes a `threshold`
    pub fn is_enabled(&self, threshold: LogLevel) -> bool {
        *self >= threshold
    }
}

pub(crate) fn emit(level: LogLevel, component_id: &str, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(component = component_id, "{}", message),
        LogLevel::Info => tracing::info!(component = component_id, "{}", message),
        LogLevel::Warn => tracing::warn!(component = component_id, "{}", message),
        LogLevel::Error => tracing::error!(component = component_id, "{}", message),
    }
}
