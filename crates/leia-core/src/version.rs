use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Produces version ids for new schema records.
pub trait VersionIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// `V<epoch millis>`, strictly increasing within one generator.
#[derive(Debug, Default)]
pub struct TimestampVersionGenerator {
    last: AtomicI64,
}

impl TimestampVersionGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VersionIdGenerator for TimestampVersionGenerator {
    fn generate(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        format!("V{}", now.max(previous + 1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn versions_are_unique_and_prefixed() {
        let generator = TimestampVersionGenerator::new();
        let versions: HashSet<String> = (0..100).map(|_| generator.generate()).collect();
        assert_eq!(versions.len(), 100);
        assert!(versions.iter().all(|v| v.starts_with('V')));
    }
}
