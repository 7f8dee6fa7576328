use leia_models::LeiaMessage;
use serde::{Deserialize, Serialize};

use super::config::HttpBackendConfig;

/// Resolved address of an HTTP backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeiaHttpEndPoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub uri: String,
}

impl LeiaHttpEndPoint {
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let path = self.uri.trim_start_matches('/');
        format!("{scheme}://{}:{}/{path}", self.host, self.port)
    }
}

impl From<&HttpBackendConfig> for LeiaHttpEndPoint {
    fn from(config: &HttpBackendConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            secure: config.secure,
            uri: config.uri.clone(),
        }
    }
}

/// Request body posted to an HTTP backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeiaHttpEntity {
    pub backend_name: String,
    pub messages: Vec<LeiaMessage>,
}

impl LeiaHttpEntity {
    pub fn new(backend_name: impl Into<String>, messages: &[LeiaMessage]) -> Self {
        Self {
            backend_name: backend_name.into(),
            messages: messages.to_vec(),
        }
    }
}
