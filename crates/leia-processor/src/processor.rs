use std::collections::BTreeMap;
use std::sync::Arc;

use leia_models::LeiaMessage;
use tracing::{debug, error, warn};

use crate::error::{ExecutorError, Result};
use crate::executor::MessageExecutor;
use crate::filter::BackendFilter;
use crate::resolver::NameResolver;

/// Consumes the output of one multiplex call.
pub trait MessageProcessor: Send + Sync {
    fn process_messages(&self, messages: &[LeiaMessage], filter: &dyn BackendFilter)
        -> Result<()>;
}

/// Groups messages per eligible backend and sends each group once.
///
/// Every backend is attempted even after a failure; the first failure is
/// returned.
pub struct ExecutorMessageProcessor {
    resolver: Arc<dyn NameResolver>,
    executors: BTreeMap<String, Arc<dyn MessageExecutor>>,
}

impl ExecutorMessageProcessor {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            resolver,
            executors: BTreeMap::new(),
        }
    }

    /// Register `executor` under its own name.
    pub fn with_executor(mut self, executor: Arc<dyn MessageExecutor>) -> Self {
        self.executors.insert(executor.name().to_owned(), executor);
        self
    }

    fn batches(
        &self,
        messages: &[LeiaMessage],
        filter: &dyn BackendFilter,
    ) -> BTreeMap<String, Vec<LeiaMessage>> {
        let mut batches: BTreeMap<String, Vec<LeiaMessage>> = BTreeMap::new();
        for message in messages {
            for backend in self.resolver.eligible_backends(message) {
                if !filter.should_process(&backend) {
                    debug!(%backend, schema = %message.schema_key, "backend filtered out");
                    continue;
                }
                batches.entry(backend).or_default().push(message.clone());
            }
        }
        batches
    }
}

impl MessageProcessor for ExecutorMessageProcessor {
    fn process_messages(
        &self,
        messages: &[LeiaMessage],
        filter: &dyn BackendFilter,
    ) -> Result<()> {
        let mut first_error: Option<ExecutorError> = None;
        for (backend, batch) in self.batches(messages, filter) {
            let Some(executor) = self.executors.get(&backend) else {
                warn!(
                    %backend,
                    count = batch.len(),
                    "no executor registered for backend, skipping"
                );
                continue;
            };
            if let Err(err) = executor.send(&batch) {
                error!(%backend, error = %err, "dispatch to backend failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use leia_models::SchemaKey;
    use serde_json::json;

    use super::*;
    use crate::filter::{AllowAllBackendFilter, BlacklistBackendFilter};
    use crate::resolver::TagBasedNameResolver;

    struct RecordingExecutor {
        name: String,
        fail: bool,
        batches: Mutex<Vec<Vec<LeiaMessage>>>,
    }

    impl RecordingExecutor {
        fn new(name: &str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail,
                batches: Mutex::new(Vec::new()),
            })
        }

        fn batches(&self) -> Vec<Vec<LeiaMessage>> {
            self.batches.lock().expect("lock").clone()
        }
    }

    impl MessageExecutor for RecordingExecutor {
        fn name(&self) -> &str {
            &self.name
        }

        fn send_envelope(&self, messages: &[LeiaMessage]) -> Result<()> {
            self.batches.lock().expect("lock").push(messages.to_vec());
            if self.fail {
                return Err(ExecutorError::Rejected {
                    backend: self.name.clone(),
                    message: "refused".into(),
                });
            }
            Ok(())
        }

        fn handle_exception(&self, _: &[LeiaMessage], error: ExecutorError) -> Result<()> {
            Err(error)
        }
    }

    fn message(name: &str, tags: &[&str]) -> LeiaMessage {
        LeiaMessage::new(SchemaKey::new("ns", name, "V1"), json!({ "name": name }))
            .with_tags(tags.iter().copied())
    }

    #[test]
    fn groups_messages_per_backend_in_order() {
        let audit = RecordingExecutor::new("audit", false);
        let search = RecordingExecutor::new("search", false);
        let processor = ExecutorMessageProcessor::new(Arc::new(TagBasedNameResolver::new()))
            .with_executor(audit.clone())
            .with_executor(search.clone());

        let messages = vec![
            message("a", &["BACKEND::audit", "BACKEND::search"]),
            message("b", &["BACKEND::audit"]),
            message("c", &[]),
        ];
        processor
            .process_messages(&messages, &AllowAllBackendFilter)
            .expect("dispatch should succeed");

        let audit_batches = audit.batches();
        assert_eq!(audit_batches.len(), 1);
        assert_eq!(audit_batches[0], vec![messages[0].clone(), messages[1].clone()]);
        assert_eq!(search.batches(), vec![vec![messages[0].clone()]]);
    }

    #[test]
    fn filtered_and_unknown_backends_are_skipped() {
        let audit = RecordingExecutor::new("audit", false);
        let processor = ExecutorMessageProcessor::new(Arc::new(TagBasedNameResolver::new()))
            .with_executor(audit.clone());

        processor
            .process_messages(
                &[message("a", &["BACKEND::audit", "BACKEND::unknown"])],
                &BlacklistBackendFilter::new(["audit"]),
            )
            .expect("dispatch should succeed");

        assert!(audit.batches().is_empty());
    }

    #[test]
    fn failure_does_not_stop_other_backends() {
        let audit = RecordingExecutor::new("audit", true);
        let search = RecordingExecutor::new("search", false);
        let processor = ExecutorMessageProcessor::new(Arc::new(TagBasedNameResolver::new()))
            .with_executor(audit.clone())
            .with_executor(search.clone());

        let err = processor
            .process_messages(
                &[message("a", &["BACKEND::audit", "BACKEND::search"])],
                &AllowAllBackendFilter,
            )
            .expect_err("dispatch should fail");

        assert_eq!(err.backend(), "audit");
        assert_eq!(search.batches().len(), 1);
    }
}
