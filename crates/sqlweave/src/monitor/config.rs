use std::time::Duration;

/// Timing configuration for an [`InstrumentedExecutor`](super::InstrumentedExecutor).
///
/// Neither limit is set by default.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    /// Queries running longer fail with [`WeaveError::Timeout`](crate::WeaveError::Timeout).
    pub query_timeout: Option<Duration>,
    /// Queries running longer are reported with `tracing::warn!`.
    pub slow_query_threshold: Option<Duration>,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query timeout duration.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }
}
