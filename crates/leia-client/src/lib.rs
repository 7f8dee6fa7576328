//! Transformation and multiplexing engine of leia.
//!
//! [`LeiaClient`] turns one source message into zero or more messages for
//! the consumer schemas declared as transformation targets of the source
//! schema, validating each derived payload before it is returned or
//! dispatched.

pub mod client;
pub mod error;
pub mod index;
pub mod path;
pub mod target;
pub mod validity;

pub use client::LeiaClient;
pub use error::{Result, TransformationError};
pub use index::{CompiledTarget, IndexError, SchemaIndex};
pub use path::CompiledPath;
pub use target::{AlwaysEligible, CompiledCriteria, CriteriaTargetValidator, TargetValidator};
pub use validity::{AllSchemasValid, RegisteredSchemas, SchemaKeyValidator};
