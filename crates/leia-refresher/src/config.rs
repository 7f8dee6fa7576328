use std::time::Duration;

/// Configuration of a [`TimeBasedDataProvider`](crate::TimeBasedDataProvider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefresherConfig {
    /// Delay between two refreshes.
    pub interval: Duration,
    /// Used in log events and as the worker thread name.
    pub name: String,
}

impl RefresherConfig {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            interval,
            name: name.into(),
        }
    }
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            name: "leia-refresher".to_string(),
        }
    }
}
