use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::SchemaKey;

/// Input to one multiplex call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub schema_key: SchemaKey,
    pub message: Value,
    /// Also emit the untouched source message.
    #[serde(default)]
    pub include_source: bool,
}

impl MessageRequest {
    pub fn new(schema_key: SchemaKey, message: Value) -> Self {
        Self {
            schema_key,
            message,
            include_source: false,
        }
    }

    pub fn including_source(mut self) -> Self {
        self.include_source = true;
        self
    }
}

/// Output unit of the multiplexer and input unit of the dispatch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeiaMessage {
    pub schema_key: SchemaKey,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub message: Value,
}

impl LeiaMessage {
    pub fn new(schema_key: SchemaKey, message: Value) -> Self {
        Self {
            schema_key,
            tags: BTreeSet::new(),
            message,
        }
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
