//! Dispatch of multiplexed messages to named backends.
//!
//! A [`MessageExecutor`] owns the transport to one backend and the policy
//! for failed batches. [`ExecutorMessageProcessor`] fans a set of messages
//! out to executors, using a [`NameResolver`] to pick backends per message
//! and a [`BackendFilter`] to exclude some of them.
//!
//! Enable the `http` feature for [`http::HttpMessageExecutor`].

pub mod error;
pub mod executor;
pub mod filter;
#[cfg(feature = "http")]
pub mod http;
pub mod processor;
pub mod resolver;

pub use error::{ExecutorError, ExecutorErrorKind, Result};
pub use executor::{LoggingExceptionHandler, MessageExceptionHandler, MessageExecutor};
pub use filter::{
    AllowAllBackendFilter, BackendFilter, BlacklistBackendFilter, RegexBackendFilter,
    WhitelistBackendFilter,
};
pub use processor::{ExecutorMessageProcessor, MessageProcessor};
pub use resolver::{NameResolver, TagBasedNameResolver, BACKEND_TAG_PREFIX};
