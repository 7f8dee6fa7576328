use std::fmt;

use serde::{Deserialize, Serialize};

/// One structural mismatch between a payload and its schema.
///
/// `field_path` uses dot-separated object traversal with bracket notation for
/// array indices (`items[2]`) and map entries (`labels['env'].value`).
/// Consumers key results by this path, so its grammar is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeiaMessageViolation {
    pub message: String,
    pub field_path: String,
}

impl LeiaMessageViolation {
    pub fn new(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_path: field_path.into(),
        }
    }
}

impl fmt::Display for LeiaMessageViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field_path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.field_path)
        }
    }
}
