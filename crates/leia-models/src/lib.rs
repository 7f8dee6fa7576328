//! Data model of the leia schema registry.
//!
//! This is the lowest layer of leia. It defines:
//! - [`SchemaKey`], the structural identity of a schema version
//! - [`SchemaAttribute`], a closed recursive attribute type with visitor dispatch
//! - [`SchemaDetails`], the stored schema record with its audit history
//! - [`MessageRequest`] and [`LeiaMessage`], the units flowing through the
//!   multiplexer and the dispatch layer
//!
//! Everything here is plain data. Validation, lifecycle rules and
//! transformation live in the crates layered on top.

pub mod attributes;
pub mod criteria;
pub mod key;
pub mod message;
pub mod qualifier;
pub mod request;
pub mod schema;

pub use attributes::{AttributeKind, DataType, SchemaAttribute, SchemaAttributeVisitor};
pub use criteria::Criteria;
pub use key::SchemaKey;
pub use message::{LeiaMessage, MessageRequest};
pub use qualifier::{QualifierInfo, QualifierType};
pub use request::{CreateSchemaRequest, SchemaUpdater, SearchRequest, UpdateSchemaRequest};
pub use schema::{
    SchemaDetails, SchemaEvent, SchemaHistoryItem, SchemaState, SchemaType, SchemaValidationType,
    TransformationTarget, Transformer,
};
