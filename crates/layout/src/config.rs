//! Layout engine configuration.

use serde::{Deserialize, Serialize};

/// Layout engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Slack smaller than this is treated as zero.
    pub epsilon: f32,
    /// Upper bound on freeze passes when distributing space.
    pub max_distribution_passes: usize,
    /// Log every arranged frame at trace level, not only views with
    /// `debug_layout` set.
    pub trace_passes: bool,
}

impl LayoutConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that traces every arranged frame.
    pub fn verbose() -> Self {
        Self {
            trace_passes: true,
            ..Self::default()
        }
    }

    /// Set the slack tolerance.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the distribution pass limit.
    pub fn with_max_distribution_passes(mut self, passes: usize) -> Self {
        self.max_distribution_passes = passes;
        self
    }

    /// Set pass tracing.
    pub fn with_trace_passes(mut self, enabled: bool) -> Self {
        self.trace_passes = enabled;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            max_distribution_passes: 32,
            trace_passes: false,
        }
    }
}
