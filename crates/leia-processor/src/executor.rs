use std::collections::HashSet;

use leia_models::LeiaMessage;
use tracing::{debug, error};

use crate::error::{ExecutorError, ExecutorErrorKind, Result};

/// Delivers message batches to one named backend.
///
/// Implementors provide the transport in [`send_envelope`] and the failure
/// policy in [`handle_exception`]; callers use [`send`], which runs the
/// transport once and routes a failure either to the drop-set or to the
/// failure hook, never both and never more than once.
///
/// [`send_envelope`]: MessageExecutor::send_envelope
/// [`handle_exception`]: MessageExecutor::handle_exception
/// [`send`]: MessageExecutor::send
pub trait MessageExecutor: Send + Sync {
    fn name(&self) -> &str;

    /// Backend-specific delivery of the whole batch.
    fn send_envelope(&self, messages: &[LeiaMessage]) -> Result<()>;

    /// Error kinds that are logged and dropped instead of handled.
    fn droppable_errors(&self) -> HashSet<ExecutorErrorKind> {
        HashSet::new()
    }

    fn is_error_ignorable(&self, error: &ExecutorError) -> bool {
        self.droppable_errors().contains(&error.kind())
    }

    /// Failure hook, invoked with the complete failed batch.
    ///
    /// An `Err` returned here propagates to the caller of [`send`](MessageExecutor::send).
    fn handle_exception(&self, messages: &[LeiaMessage], error: ExecutorError) -> Result<()>;

    fn send(&self, messages: &[LeiaMessage]) -> Result<()> {
        let err = match self.send_envelope(messages) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        error!(
            executor = self.name(),
            error = %err,
            "failed to send messages, trying the exception handler"
        );
        if self.is_error_ignorable(&err) {
            debug!(executor = self.name(), kind = %err.kind(), "error marked droppable, ignoring");
            return Ok(());
        }
        self.handle_exception(messages, err)
    }
}

/// Pluggable failure policy shared by executors.
///
/// The handler may retry through `executor.send`, escalate by returning an
/// error, or record the batch and return `Ok`.
pub trait MessageExceptionHandler: Send + Sync {
    fn handle_exception(
        &self,
        messages: &[LeiaMessage],
        error: ExecutorError,
        backend_name: &str,
        executor: &dyn MessageExecutor,
    ) -> Result<()>;
}

/// Logs every failed message and swallows the error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingExceptionHandler;

impl MessageExceptionHandler for LoggingExceptionHandler {
    fn handle_exception(
        &self,
        messages: &[LeiaMessage],
        error: ExecutorError,
        backend_name: &str,
        _: &dyn MessageExecutor,
    ) -> Result<()> {
        error!(
            backend = backend_name,
            count = messages.len(),
            error = %error,
            "dropping failed batch"
        );
        for message in messages {
            error!(
                backend = backend_name,
                schema = %message.schema_key,
                tags = ?message.tags,
                "failed message"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use leia_models::SchemaKey;
    use serde_json::json;

    use super::*;

    struct FlakyExecutor {
        failures_left: AtomicUsize,
        failure: fn() -> ExecutorError,
        droppable: HashSet<ExecutorErrorKind>,
        envelopes: AtomicUsize,
        handled: Mutex<Vec<usize>>,
        retry_in_handler: bool,
    }

    impl FlakyExecutor {
        fn new(failures: usize, failure: fn() -> ExecutorError) -> Self {
            Self {
                failures_left: AtomicUsize::new(failures),
                failure,
                droppable: HashSet::new(),
                envelopes: AtomicUsize::new(0),
                handled: Mutex::new(Vec::new()),
                retry_in_handler: false,
            }
        }
    }

    impl MessageExecutor for FlakyExecutor {
        fn name(&self) -> &str {
            "flaky"
        }

        fn send_envelope(&self, _: &[LeiaMessage]) -> Result<()> {
            self.envelopes.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failing {
                Err((self.failure)())
            } else {
                Ok(())
            }
        }

        fn droppable_errors(&self) -> HashSet<ExecutorErrorKind> {
            self.droppable.clone()
        }

        fn handle_exception(&self, messages: &[LeiaMessage], error: ExecutorError) -> Result<()> {
            self.handled.lock().expect("lock").push(messages.len());
            if self.retry_in_handler {
                self.send(messages)
            } else {
                Err(error)
            }
        }
    }

    fn server_error() -> ExecutorError {
        ExecutorError::Status {
            backend: "flaky".into(),
            status: 500,
            body: String::new(),
        }
    }

    fn batch() -> Vec<LeiaMessage> {
        (0..3)
            .map(|i| LeiaMessage::new(SchemaKey::new("ns", "event", "V1"), json!({ "i": i })))
            .collect()
    }

    #[test]
    fn success_skips_the_hook() {
        let executor = FlakyExecutor::new(0, server_error);
        executor.send(&batch()).expect("send should succeed");
        assert!(executor.handled.lock().expect("lock").is_empty());
    }

    #[test]
    fn failure_invokes_hook_once_with_whole_batch() {
        let executor = FlakyExecutor::new(1, server_error);
        let err = executor.send(&batch()).expect_err("send should fail");

        assert_eq!(err.kind(), ExecutorErrorKind::Status);
        assert_eq!(*executor.handled.lock().expect("lock"), vec![3]);
        assert_eq!(executor.envelopes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn droppable_failure_skips_the_hook() {
        let mut executor = FlakyExecutor::new(1, server_error);
        executor.droppable.insert(ExecutorErrorKind::Status);

        executor.send(&batch()).expect("dropped error should not surface");
        assert!(executor.handled.lock().expect("lock").is_empty());
    }

    #[test]
    fn drop_set_only_matches_its_kinds() {
        let mut executor = FlakyExecutor::new(1, || ExecutorError::Transport {
            backend: "flaky".into(),
            message: "connection refused".into(),
        });
        executor.droppable.insert(ExecutorErrorKind::Status);

        assert!(executor.send(&batch()).is_err());
        assert_eq!(executor.handled.lock().expect("lock").len(), 1);
    }

    #[test]
    fn hook_may_retry_through_send() {
        let mut executor = FlakyExecutor::new(1, server_error);
        executor.retry_in_handler = true;

        executor.send(&batch()).expect("retry should succeed");
        assert_eq!(executor.envelopes.load(Ordering::SeqCst), 2);
        assert_eq!(executor.handled.lock().expect("lock").len(), 1);
    }

    #[test]
    fn logging_handler_swallows_errors() {
        let executor = FlakyExecutor::new(0, server_error);
        LoggingExceptionHandler
            .handle_exception(&batch(), server_error(), "flaky", &executor)
            .expect("logging handler should not fail");
    }
}
