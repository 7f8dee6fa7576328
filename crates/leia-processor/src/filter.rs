use std::collections::BTreeSet;

use regex::Regex;

/// Decides whether a backend takes part in a dispatch cycle.
pub trait BackendFilter: Send + Sync {
    fn should_process(&self, backend_name: &str) -> bool;
}

/// Lets every backend through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllBackendFilter;

impl BackendFilter for AllowAllBackendFilter {
    fn should_process(&self, _: &str) -> bool {
        true
    }
}

/// Only the listed backends.
#[derive(Debug, Clone, Default)]
pub struct WhitelistBackendFilter {
    allowed: BTreeSet<String>,
}

impl WhitelistBackendFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl BackendFilter for WhitelistBackendFilter {
    fn should_process(&self, backend_name: &str) -> bool {
        self.allowed.contains(backend_name)
    }
}

/// Every backend except the listed ones.
#[derive(Debug, Clone, Default)]
pub struct BlacklistBackendFilter {
    excluded: BTreeSet<String>,
}

impl BlacklistBackendFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }
}

impl BackendFilter for BlacklistBackendFilter {
    fn should_process(&self, backend_name: &str) -> bool {
        !self.excluded.contains(backend_name)
    }
}

/// Backends whose whole name matches a pattern.
#[derive(Debug, Clone)]
pub struct RegexBackendFilter {
    pattern: Regex,
}

impl RegexBackendFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }
}

impl BackendFilter for RegexBackendFilter {
    fn should_process(&self, backend_name: &str) -> bool {
        self.pattern.is_match(backend_name)
    }
}
