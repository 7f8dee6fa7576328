use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::SchemaAttribute;
use crate::criteria::Criteria;
use crate::key::SchemaKey;

/// Lifecycle state of a schema record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaState {
    Created,
    Approved,
    Rejected,
}

impl fmt::Display for SchemaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaState::Created => "CREATED",
            SchemaState::Approved => "APPROVED",
            SchemaState::Rejected => "REJECTED",
        })
    }
}

/// Encoding family the schema describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    #[default]
    Json,
    Avro,
    Protobuf,
}

/// How strictly a payload must match the attribute set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaValidationType {
    /// Required attributes must be present; extra fields are allowed.
    #[default]
    Matching,
    /// Matching, plus every field must be declared.
    Strict,
}

/// Registry event driving the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaEvent {
    CreateSchema,
    UpdateSchema,
    ApproveSchema,
    RejectSchema,
}

impl SchemaEvent {
    pub const ALL: [SchemaEvent; 4] = [
        SchemaEvent::CreateSchema,
        SchemaEvent::UpdateSchema,
        SchemaEvent::ApproveSchema,
        SchemaEvent::RejectSchema,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaEvent::CreateSchema => "CREATE_SCHEMA",
            SchemaEvent::UpdateSchema => "UPDATE_SCHEMA",
            SchemaEvent::ApproveSchema => "APPROVE_SCHEMA",
            SchemaEvent::RejectSchema => "REJECT_SCHEMA",
        }
    }
}

impl fmt::Display for SchemaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit entry. Appended by lifecycle processors, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaHistoryItem {
    pub updater_id: String,
    pub updater_email: String,
    pub updater_name: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub event: SchemaEvent,
}

/// Extracts one target attribute from the source message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    pub attribute_name: String,
    /// JSONPath expression evaluated against the source payload.
    pub transformation_path: String,
}

impl Transformer {
    pub fn new(attribute_name: impl Into<String>, transformation_path: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            transformation_path: transformation_path.into(),
        }
    }
}

/// A consumer schema derived from a source schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationTarget {
    pub schema_key: SchemaKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    #[serde(default)]
    pub transformers: Vec<Transformer>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TransformationTarget {
    pub fn new(schema_key: SchemaKey, transformers: Vec<Transformer>) -> Self {
        Self {
            schema_key,
            criteria: None,
            transformers,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// A schema record as stored by the registry.
///
/// The key fields are flattened into the record on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDetails {
    #[serde(flatten)]
    pub schema_key: SchemaKey,
    #[serde(default)]
    pub description: String,
    pub schema_state: SchemaState,
    #[serde(default)]
    pub schema_type: SchemaType,
    #[serde(default)]
    pub validation_type: SchemaValidationType,
    #[serde(default)]
    pub attributes: Vec<SchemaAttribute>,
    #[serde(default)]
    pub transformation_targets: Vec<TransformationTarget>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub history: Vec<SchemaHistoryItem>,
}

impl SchemaDetails {
    /// A fresh CREATED record with no attributes, targets or history.
    pub fn new(schema_key: SchemaKey) -> Self {
        Self {
            schema_key,
            description: String::new(),
            schema_state: SchemaState::Created,
            schema_type: SchemaType::default(),
            validation_type: SchemaValidationType::default(),
            attributes: Vec::new(),
            transformation_targets: Vec::new(),
            tags: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    pub fn with_validation_type(mut self, validation_type: SchemaValidationType) -> Self {
        self.validation_type = validation_type;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<SchemaAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_target(mut self, target: TransformationTarget) -> Self {
        self.transformation_targets.push(target);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn reference_id(&self) -> String {
        self.schema_key.reference_id()
    }

    pub fn add_history(&mut self, item: SchemaHistoryItem) {
        self.history.push(item);
    }

    /// The most recent audit entry, if any.
    pub fn last_history(&self) -> Option<&SchemaHistoryItem> {
        self.history.last()
    }
}
