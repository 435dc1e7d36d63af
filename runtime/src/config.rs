//! Dispatcher configuration.

/// Configuration for [`Dispatcher`](crate::Dispatcher) instances
///
/// # Example
///
/// ```
/// use reactive_reducer_runtime::{reduce, DispatcherConfig};
///
/// let config = DispatcherConfig::default()
///     .with_name("counter")
///     .with_metrics(false);
///
/// let dispatcher = reduce(|count: &i64, by: i64| count + by, 0_i64).with_config(config);
/// assert_eq!(dispatcher.config().name, "counter");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Label attached to the `dispatch` tracing span and to metrics
    pub name: &'static str,
    /// Whether fold steps and sequence outcomes are counted through `metrics`
    pub record_metrics: bool,
}

impl DispatcherConfig {
    /// Name used when none is configured
    pub const DEFAULT_NAME: &'static str = "dispatcher";

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(name: &'static str, record_metrics: bool) -> Self {
        Self {
            name,
            record_metrics,
        }
    }

    /// Set the dispatcher name
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Enable or disable metric recording
    #[must_use]
    pub const fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, true)
    }
}
