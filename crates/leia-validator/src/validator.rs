use leia_models::SchemaDetails;
use serde_json::Value;
use tracing::debug;

use crate::structural;
use crate::violation::LeiaMessageViolation;

/// Checks a payload against a schema record.
///
/// Implementations report problems as violations and never fail; an empty
/// list means the payload is valid.
pub trait MessageValidator: Send + Sync {
    fn validate(&self, schema: &SchemaDetails, payload: &Value) -> Vec<LeiaMessageViolation>;
}

/// Accepts every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMessageValidator;

impl MessageValidator for NoOpMessageValidator {
    fn validate(&self, _: &SchemaDetails, _: &Value) -> Vec<LeiaMessageViolation> {
        Vec::new()
    }
}

/// Structural validation honoring the schema's validation type.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralMessageValidator;

impl MessageValidator for StructuralMessageValidator {
    fn validate(&self, schema: &SchemaDetails, payload: &Value) -> Vec<LeiaMessageViolation> {
        let violations =
            structural::validate(payload, schema.validation_type, &schema.attributes);
        if !violations.is_empty() {
            debug!(
                schema = %schema.schema_key,
                violations = violations.len(),
                "payload does not match schema"
            );
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use leia_models::{SchemaAttribute, SchemaKey, SchemaValidationType};
    use serde_json::json;

    use super::*;

    fn schema(validation_type: SchemaValidationType) -> SchemaDetails {
        SchemaDetails::new(SchemaKey::new("ns", "order", "V1"))
            .with_validation_type(validation_type)
            .with_attributes(vec![SchemaAttribute::integer("a")])
    }

    #[test]
    fn structural_validator_uses_record_validation_type() {
        let payload = json!({"a": 1, "b": 2});

        let matching =
            StructuralMessageValidator.validate(&schema(SchemaValidationType::Matching), &payload);
        assert!(matching.is_empty());

        let strict =
            StructuralMessageValidator.validate(&schema(SchemaValidationType::Strict), &payload);
        assert_eq!(strict, vec![LeiaMessageViolation::new("Unexpected field: b", "b")]);
    }

    #[test]
    fn noop_validator_accepts_anything() {
        let violations =
            NoOpMessageValidator.validate(&schema(SchemaValidationType::Strict), &json!("nope"));
        assert!(violations.is_empty());
    }

    #[test]
    fn validators_are_usable_as_trait_objects() {
        let validators: Vec<Box<dyn MessageValidator>> =
            vec![Box::new(NoOpMessageValidator), Box::new(StructuralMessageValidator)];
        let counts: Vec<usize> = validators
            .iter()
            .map(|v| v.validate(&schema(SchemaValidationType::Matching), &json!({})).len())
            .collect();
        assert_eq!(counts, vec![0, 1]);
    }
}
