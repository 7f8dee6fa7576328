//! Blocking HTTP delivery backend.

pub mod config;
pub mod entity;
pub mod executor;

pub use config::{ConfigError, HttpBackendConfig, HttpClientConfig};
pub use entity::{LeiaHttpEndPoint, LeiaHttpEntity};
pub use executor::HttpMessageExecutor;
