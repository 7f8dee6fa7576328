use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Eligibility rule attached to a transformation target.
///
/// Paths are JSONPath expressions evaluated against the parsed source
/// message. Evaluation lives with the multiplexer; this type is data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criteria {
    /// Every nested rule holds. Empty is true.
    And { criteria: Vec<Criteria> },
    /// At least one nested rule holds. Empty is false.
    Or { criteria: Vec<Criteria> },
    Not { criteria: Box<Criteria> },
    /// The path resolves to exactly `value`.
    Equals { path: String, value: Value },
    /// The path resolves to at least one node.
    Exists { path: String },
    /// The path resolves to one of `values`.
    In { path: String, values: Vec<Value> },
}

impl Criteria {
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Criteria::Equals {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn exists(path: impl Into<String>) -> Self {
        Criteria::Exists { path: path.into() }
    }

    /// Every JSONPath expression referenced by this rule tree.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Criteria::And { criteria } | Criteria::Or { criteria } => {
                for nested in criteria {
                    nested.collect_paths(out);
                }
            }
            Criteria::Not { criteria } => criteria.collect_paths(out),
            Criteria::Equals { path, .. }
            | Criteria::Exists { path }
            | Criteria::In { path, .. } => out.push(path),
        }
    }
}
