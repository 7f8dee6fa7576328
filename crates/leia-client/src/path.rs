use serde_json::Value;
use serde_json_path::JsonPath;

/// A compiled JSONPath expression.
#[derive(Debug, Clone)]
pub struct CompiledPath {
    expression: String,
    path: JsonPath,
}

impl CompiledPath {
    pub fn compile(expression: &str) -> Result<Self, serde_json_path::ParseError> {
        Ok(Self {
            expression: expression.to_owned(),
            path: JsonPath::parse(expression)?,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Value at this path in `document`.
    ///
    /// No match is `None`, a single match is that value, and several matches
    /// are collected into an array in document order.
    pub fn extract(&self, document: &Value) -> Option<Value> {
        let mut nodes = self.path.query(document).all();
        match nodes.len() {
            0 => None,
            1 => nodes.pop().cloned(),
            _ => Some(Value::Array(nodes.into_iter().cloned().collect())),
        }
    }
}
