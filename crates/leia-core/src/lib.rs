//! Schema lifecycle for the leia registry.
//!
//! Records move CREATED → APPROVED or CREATED → REJECTED; updates either
//! mutate a CREATED record or fork an APPROVED one into a new version. Every
//! event is handled by one [`SchemaProcessor`] found through a
//! [`SchemaProcessorHub`], and [`SchemaIngestor`] is the thin entry point.
//!
//! Storage sits behind [`SchemaRepository`]; [`InMemorySchemaRepository`] is
//! the process-local implementation.

pub mod context;
pub mod error;
pub mod hub;
pub mod ingestor;
pub mod processors;
pub mod repository;
pub mod version;

pub use context::{SchemaContext, SchemaRequest};
pub use error::{LeiaError, LeiaErrorCode, Result};
pub use hub::{DefaultProcessorHub, SchemaProcessorHub};
pub use ingestor::SchemaIngestor;
pub use processors::{
    ApproveSchemaProcessor, CreateSchemaProcessor, RejectSchemaProcessor, SchemaProcessor,
    UpdateSchemaProcessor,
};
pub use repository::{InMemorySchemaRepository, SchemaRepository};
pub use version::{TimestampVersionGenerator, VersionIdGenerator};
