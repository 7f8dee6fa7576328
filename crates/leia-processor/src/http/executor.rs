use std::collections::HashSet;
use std::sync::Arc;

use leia_models::LeiaMessage;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::config::HttpBackendConfig;
use super::entity::{LeiaHttpEndPoint, LeiaHttpEntity};
use crate::error::{ExecutorError, ExecutorErrorKind, Result};
use crate::executor::{MessageExceptionHandler, MessageExecutor};

type AuthorizationSupplier = dyn Fn() -> String + Send + Sync;

/// Posts message batches as a JSON [`LeiaHttpEntity`] to one backend.
///
/// The call blocks the current thread. `retry_count` extra attempts are made
/// inside [`send_envelope`](MessageExecutor::send_envelope), so the failure
/// hook still runs at most once per `send`.
pub struct HttpMessageExecutor {
    config: HttpBackendConfig,
    endpoint: LeiaHttpEndPoint,
    client: Client,
    authorization: Option<Box<AuthorizationSupplier>>,
    exception_handler: Option<Arc<dyn MessageExceptionHandler>>,
    droppable: HashSet<ExecutorErrorKind>,
}

impl HttpMessageExecutor {
    pub fn new(config: HttpBackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ExecutorError::Transport {
                backend: config.backend_name.clone(),
                message: err.to_string(),
            })?;
        Ok(Self {
            endpoint: LeiaHttpEndPoint::from(&config),
            config,
            client,
            authorization: None,
            exception_handler: None,
            droppable: HashSet::new(),
        })
    }

    /// Override the endpoint derived from the backend configuration.
    pub fn with_endpoint(mut self, endpoint: LeiaHttpEndPoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Value of the `Authorization` header, computed per request.
    pub fn with_authorization<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.authorization = Some(Box::new(supplier));
        self
    }

    pub fn with_exception_handler(mut self, handler: Arc<dyn MessageExceptionHandler>) -> Self {
        self.exception_handler = Some(handler);
        self
    }

    pub fn with_droppable_errors(
        mut self,
        kinds: impl IntoIterator<Item = ExecutorErrorKind>,
    ) -> Self {
        self.droppable.extend(kinds);
        self
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &LeiaHttpEndPoint {
        &self.endpoint
    }

    fn post(&self, url: &str, body: &[u8]) -> Result<()> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec());
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization());
        }

        let response = request.send().map_err(|err| ExecutorError::Transport {
            backend: self.config.backend_name.clone(),
            message: err.to_string(),
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(ExecutorError::Status {
            backend: self.config.backend_name.clone(),
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

impl MessageExecutor for HttpMessageExecutor {
    fn name(&self) -> &str {
        &self.config.backend_name
    }

    fn send_envelope(&self, messages: &[LeiaMessage]) -> Result<()> {
        if self.endpoint.host.is_empty() {
            return Err(ExecutorError::Endpoint {
                backend: self.config.backend_name.clone(),
                message: "host is empty".into(),
            });
        }
        let url = self.endpoint.url();
        let entity = LeiaHttpEntity::new(self.config.backend_name.clone(), messages);
        let body = serde_json::to_vec(&entity).map_err(|source| ExecutorError::Serialization {
            backend: self.config.backend_name.clone(),
            source,
        })?;

        let attempts = self.config.retry_count.saturating_add(1);
        let mut attempt = 1;
        loop {
            match self.post(&url, &body) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < attempts => {
                    debug!(
                        backend = %self.config.backend_name,
                        attempt,
                        attempts,
                        error = %err,
                        "http delivery attempt failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn droppable_errors(&self) -> HashSet<ExecutorErrorKind> {
        self.droppable.clone()
    }

    /// Delegates to the configured handler; without one the error propagates.
    fn handle_exception(&self, messages: &[LeiaMessage], error: ExecutorError) -> Result<()> {
        match &self.exception_handler {
            Some(handler) => handler.handle_exception(messages, error, self.name(), self),
            None => Err(error),
        }
    }
}
