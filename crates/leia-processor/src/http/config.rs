use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolver::TagBasedNameResolver;

/// Errors that can occur while loading HTTP client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One HTTP delivery backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpBackendConfig {
    pub backend_name: String,
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub uri: String,
    /// Extra transport attempts after the first one.
    pub retry_count: u32,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Messages carrying any of these tags are routed to this backend
    /// by the resolver built from [`HttpClientConfig`].
    pub tags: BTreeSet<String>,
}

impl HttpBackendConfig {
    pub fn new(backend_name: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            backend_name: String::new(),
            host: "127.0.0.1".to_string(),
            port: 80,
            secure: false,
            uri: "/".to_string(),
            retry_count: 0,
            timeout_ms: 5_000,
            tags: BTreeSet::new(),
        }
    }
}

/// All HTTP backends known to a process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpClientConfig {
    pub backend_configs: Vec<HttpBackendConfig>,
}

impl HttpClientConfig {
    /// Load configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn backend(&self, name: &str) -> Option<&HttpBackendConfig> {
        self.backend_configs
            .iter()
            .find(|backend| backend.backend_name == name)
    }
}

impl From<&HttpClientConfig> for TagBasedNameResolver {
    /// Bind every configured backend to its `tags`.
    fn from(config: &HttpClientConfig) -> Self {
        config
            .backend_configs
            .iter()
            .filter(|backend| !backend.tags.is_empty())
            .fold(TagBasedNameResolver::new(), |resolver, backend| {
                resolver.with_binding(backend.backend_name.clone(), backend.tags.iter().cloned())
            })
    }
}
