//! Structural matching of a JSON value tree against schema attributes.
//!
//! The validator never fails: malformed input yields violations, and an
//! empty list means the payload is valid.

use std::collections::BTreeSet;

use leia_models::{
    AttributeKind, DataType, SchemaAttribute, SchemaAttributeVisitor, SchemaValidationType,
};
use serde_json::{Number, Value};

use crate::violation::LeiaMessageViolation;

/// Validate `value` against `attributes`, with paths rooted at the payload.
pub fn validate(
    value: &Value,
    validation_type: SchemaValidationType,
    attributes: &[SchemaAttribute],
) -> Vec<LeiaMessageViolation> {
    validate_at(value, validation_type, attributes, "")
}

/// Validate `value` against `attributes`, prefixing every path with `path`.
pub fn validate_at(
    value: &Value,
    validation_type: SchemaValidationType,
    attributes: &[SchemaAttribute],
    path: &str,
) -> Vec<LeiaMessageViolation> {
    let mut violations = Vec::new();
    validate_attributes(value, validation_type, attributes, path, &mut violations);
    violations
}

fn validate_attributes(
    value: &Value,
    validation_type: SchemaValidationType,
    attributes: &[SchemaAttribute],
    path: &str,
    out: &mut Vec<LeiaMessageViolation>,
) {
    if validation_type == SchemaValidationType::Strict {
        if let Value::Object(fields) = value {
            for field in fields.keys() {
                if !attributes.iter().any(|attribute| attribute.name == *field) {
                    out.push(LeiaMessageViolation::new(
                        format!("Unexpected field: {field}"),
                        join_path(path, field),
                    ));
                }
            }
        }
    }

    for attribute in attributes {
        let field_path = join_path(path, &attribute.name);
        match value {
            Value::Object(fields) => match fields.get(&attribute.name) {
                Some(field) => validate_field(field, attribute, validation_type, &field_path, out),
                None => missing_field(attribute, &field_path, out),
            },
            // Arrays carry no named fields.
            Value::Array(_) => missing_field(attribute, &field_path, out),
            scalar => validate_field(scalar, attribute, validation_type, path, out),
        }
    }
}

fn missing_field(attribute: &SchemaAttribute, path: &str, out: &mut Vec<LeiaMessageViolation>) {
    if !attribute.optional {
        out.push(LeiaMessageViolation::new(
            format!("Missing required field: {}", attribute.name),
            path,
        ));
    }
}

fn validate_field(
    value: &Value,
    attribute: &SchemaAttribute,
    validation_type: SchemaValidationType,
    path: &str,
    out: &mut Vec<LeiaMessageViolation>,
) {
    if !attribute.accept(&mut KindMatcher { value }) {
        out.push(LeiaMessageViolation::new(
            format!(
                "Type mismatch for field: {}. Expected: {}, Found: {}",
                attribute.name,
                attribute.data_type(),
                node_type(value)
            ),
            path,
        ));
        return;
    }
    descend(value, attribute, validation_type, path, out);
}

fn descend(
    value: &Value,
    attribute: &SchemaAttribute,
    validation_type: SchemaValidationType,
    path: &str,
    out: &mut Vec<LeiaMessageViolation>,
) {
    match &attribute.kind {
        AttributeKind::Object {
            nested_attributes: Some(nested),
        } => validate_attributes(value, validation_type, nested, path, out),
        AttributeKind::Array {
            element_attribute: Some(element),
        } => {
            if let Value::Array(items) = value {
                for (index, item) in items.iter().enumerate() {
                    let element_path = format!("{path}[{index}]");
                    validate_field(item, element, validation_type, &element_path, out);
                }
            }
        }
        AttributeKind::Map {
            key_attribute,
            value_attribute,
        } if key_attribute.is_some() || value_attribute.is_some() => {
            if let Value::Object(entries) = value {
                for (key, entry) in entries {
                    let entry_path = format!("{path}['{key}']");
                    if let Some(key_attribute) = key_attribute {
                        match key_node(key, key_attribute) {
                            Some(node) => validate_field(
                                &node,
                                key_attribute,
                                validation_type,
                                &format!("{entry_path}.key"),
                                out,
                            ),
                            None => out.push(LeiaMessageViolation::new(
                                format!(
                                    "Key not present for map attribute field: {}",
                                    attribute.name
                                ),
                                path,
                            )),
                        }
                    }
                    if let Some(value_attribute) = value_attribute {
                        validate_field(
                            entry,
                            value_attribute,
                            validation_type,
                            &format!("{entry_path}.value"),
                            out,
                        );
                    }
                }
            }
        }
        AttributeKind::Parameterized {
            raw_type_attribute: Some(raw_type),
            ..
        } => descend(value, raw_type, validation_type, path, out),
        _ => {}
    }
}

/// Convert a map key into the JSON node its key attribute is checked against.
///
/// JSON object keys are always text; keys of non-textual attributes are
/// parsed as JSON scalars and `None` means the key could not be read.
fn key_node(key: &str, key_attribute: &SchemaAttribute) -> Option<Value> {
    match key_attribute.data_type() {
        DataType::Boolean
        | DataType::Byte
        | DataType::Double
        | DataType::Float
        | DataType::Integer
        | DataType::Long
        | DataType::Short => serde_json::from_str::<Value>(key).ok(),
        _ => Some(Value::String(key.to_owned())),
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_owned()
    } else {
        format!("{path}.{field}")
    }
}

/// Name of the JSON node kind, as reported in type mismatch messages.
pub fn node_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Bool(_) => "BOOLEAN",
        Value::Number(_) => "NUMBER",
        Value::String(_) => "STRING",
        Value::Array(_) => "ARRAY",
        Value::Object(_) => "OBJECT",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    /// Fits a 32-bit signed integer.
    Int,
    /// Fits a 64-bit signed integer but not 32 bits.
    Long,
    /// Integral but beyond 64-bit signed range.
    BigInteger,
    /// Carries a fraction or exponent.
    Float,
}

fn number_kind(number: &Number) -> NumberKind {
    if let Some(value) = number.as_i64() {
        if i32::try_from(value).is_ok() {
            NumberKind::Int
        } else {
            NumberKind::Long
        }
    } else if number.is_u64() {
        NumberKind::BigInteger
    } else {
        NumberKind::Float
    }
}

fn is_number_of(value: &Value, kinds: &[NumberKind]) -> bool {
    match value {
        Value::Number(number) => kinds.contains(&number_kind(number)),
        _ => false,
    }
}

fn is_byte(value: &Value) -> bool {
    value
        .as_i64()
        .is_some_and(|byte| (i64::from(i8::MIN)..=i64::from(u8::MAX)).contains(&byte))
}

/// Type compatibility of one JSON node with one attribute variant.
struct KindMatcher<'a> {
    value: &'a Value,
}

impl SchemaAttributeVisitor<bool> for KindMatcher<'_> {
    fn visit_boolean(&mut self, _: &SchemaAttribute) -> bool {
        self.value.is_boolean()
    }

    fn visit_byte(&mut self, _: &SchemaAttribute) -> bool {
        matches!(self.value, Value::Array(items) if items.iter().all(is_byte))
    }

    fn visit_character(&mut self, _: &SchemaAttribute) -> bool {
        matches!(self.value, Value::String(text) if text.chars().count() == 1)
    }

    fn visit_double(&mut self, _: &SchemaAttribute) -> bool {
        is_number_of(self.value, &[NumberKind::Int, NumberKind::Float])
    }

    fn visit_enum(&mut self, _: &SchemaAttribute, values: &BTreeSet<String>) -> bool {
        matches!(self.value, Value::String(text) if values.contains(text))
    }

    fn visit_float(&mut self, _: &SchemaAttribute) -> bool {
        is_number_of(self.value, &[NumberKind::Int, NumberKind::Float])
    }

    fn visit_integer(&mut self, _: &SchemaAttribute) -> bool {
        is_number_of(self.value, &[NumberKind::Int])
    }

    fn visit_long(&mut self, _: &SchemaAttribute) -> bool {
        is_number_of(self.value, &[NumberKind::Int, NumberKind::Long])
    }

    fn visit_short(&mut self, _: &SchemaAttribute) -> bool {
        is_number_of(self.value, &[NumberKind::Int])
    }

    fn visit_string(&mut self, _: &SchemaAttribute) -> bool {
        self.value.is_string()
    }

    fn visit_date(&mut self, _: &SchemaAttribute) -> bool {
        self.value.is_string() || is_number_of(self.value, &[NumberKind::Int, NumberKind::Long])
    }

    fn visit_array(&mut self, _: &SchemaAttribute, _: Option<&SchemaAttribute>) -> bool {
        self.value.is_array()
    }

    fn visit_map(
        &mut self,
        _: &SchemaAttribute,
        _: Option<&SchemaAttribute>,
        _: Option<&SchemaAttribute>,
    ) -> bool {
        self.value.is_object()
    }

    fn visit_object(&mut self, _: &SchemaAttribute, nested: Option<&[SchemaAttribute]>) -> bool {
        nested.is_none() || self.value.is_object()
    }

    fn visit_parameterized(
        &mut self,
        _: &SchemaAttribute,
        raw_type: Option<&SchemaAttribute>,
        _: &[SchemaAttribute],
    ) -> bool {
        raw_type.is_none_or(|raw_type| raw_type.accept(self))
    }

    fn visit_type(&mut self, _: &SchemaAttribute) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use leia_models::QualifierInfo;
    use serde_json::json;

    use super::*;

    const MATCHING: SchemaValidationType = SchemaValidationType::Matching;
    const STRICT: SchemaValidationType = SchemaValidationType::Strict;

    fn messages(violations: &[LeiaMessageViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.message.as_str()).collect()
    }

    fn paths(violations: &[LeiaMessageViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field_path.as_str()).collect()
    }

    #[test]
    fn matching_ignores_extra_fields() {
        let attributes = vec![SchemaAttribute::integer("a")];
        assert!(validate(&json!({"a": 1, "b": 2}), MATCHING, &attributes).is_empty());
    }

    #[test]
    fn strict_reports_each_undeclared_field_once() {
        let attributes = vec![SchemaAttribute::integer("a")];
        let violations = validate(&json!({"a": 1, "b": 2}), STRICT, &attributes);

        assert_eq!(messages(&violations), vec!["Unexpected field: b"]);
        assert_eq!(paths(&violations), vec!["b"]);
    }

    #[test]
    fn strict_is_matching_plus_unexpected_fields() {
        let attributes = vec![SchemaAttribute::integer("a"), SchemaAttribute::string("s")];
        let payload = json!({"a": "x", "extra": true, "other": null});

        let matching = validate(&payload, MATCHING, &attributes);
        let strict = validate(&payload, STRICT, &attributes);

        assert_eq!(strict.len(), matching.len() + 2);
        for violation in &matching {
            assert!(strict.contains(violation));
        }
    }

    #[test]
    fn missing_required_field_and_optional_field() {
        let attributes = vec![
            SchemaAttribute::string("name"),
            SchemaAttribute::string("nickname").optional(),
        ];
        let violations = validate(&json!({}), MATCHING, &attributes);

        assert_eq!(messages(&violations), vec!["Missing required field: name"]);
        assert_eq!(paths(&violations), vec!["name"]);
    }

    #[test]
    fn type_mismatch_reports_expected_and_found_kinds() {
        let attributes = vec![SchemaAttribute::string("code")];
        let violations = validate(&json!({"code": 42}), MATCHING, &attributes);

        assert_eq!(
            messages(&violations),
            vec!["Type mismatch for field: code. Expected: STRING, Found: NUMBER"]
        );
        assert_eq!(paths(&violations), vec!["code"]);
    }

    #[test]
    fn numeric_widening() {
        let int = json!(7);
        let long = json!(5_000_000_000_i64);
        let float = json!(1.5);
        let huge = json!(u64::MAX);

        let check = |attribute: SchemaAttribute, value: &Value| {
            validate(&json!({ "n": value }), MATCHING, &[attribute]).is_empty()
        };

        assert!(check(SchemaAttribute::integer("n"), &int));
        assert!(!check(SchemaAttribute::integer("n"), &long));
        assert!(!check(SchemaAttribute::integer("n"), &float));

        assert!(check(SchemaAttribute::long("n"), &int));
        assert!(check(SchemaAttribute::long("n"), &long));
        assert!(!check(SchemaAttribute::long("n"), &float));
        assert!(!check(SchemaAttribute::long("n"), &huge));

        assert!(check(SchemaAttribute::double("n"), &int));
        assert!(check(SchemaAttribute::double("n"), &float));
        assert!(!check(SchemaAttribute::double("n"), &long));

        assert!(check(SchemaAttribute::new("n", AttributeKind::Short), &int));
        assert!(check(SchemaAttribute::new("n", AttributeKind::Float), &float));
        assert!(check(SchemaAttribute::new("n", AttributeKind::Date), &long));
        assert!(check(SchemaAttribute::new("n", AttributeKind::Date), &json!("2024-01-01")));
        assert!(!check(SchemaAttribute::new("n", AttributeKind::Date), &float));
    }

    #[test]
    fn scalar_kinds() {
        let attributes = vec![
            SchemaAttribute::boolean("flag"),
            SchemaAttribute::new("initial", AttributeKind::Character),
            SchemaAttribute::enumeration("tier", ["GOLD", "SILVER"]),
            SchemaAttribute::new("blob", AttributeKind::Byte),
        ];

        let valid = json!({
            "flag": false,
            "initial": "é",
            "tier": "GOLD",
            "blob": [0, 127, 255, -1]
        });
        assert!(validate(&valid, MATCHING, &attributes).is_empty());

        let invalid = json!({"flag": "false", "initial": "ab", "tier": "BRONZE", "blob": [256]});
        let violations = validate(&invalid, MATCHING, &attributes);
        assert_eq!(
            paths(&violations),
            vec!["flag", "initial", "tier", "blob"]
        );
        assert!(violations[2].message.contains("Expected: ENUM, Found: STRING"));
        assert!(violations[3].message.contains("Expected: BYTES, Found: ARRAY"));
    }

    #[test]
    fn null_value_is_a_mismatch_except_for_untyped_objects() {
        let attributes = vec![
            SchemaAttribute::string("name"),
            SchemaAttribute::object("anything", None),
        ];
        let violations = validate(&json!({"name": null, "anything": null}), MATCHING, &attributes);

        assert_eq!(
            messages(&violations),
            vec!["Type mismatch for field: name. Expected: STRING, Found: NULL"]
        );
    }

    #[test]
    fn nested_objects_extend_the_path() {
        let attributes = vec![SchemaAttribute::object(
            "customer",
            Some(vec![
                SchemaAttribute::string("id"),
                SchemaAttribute::object("address", Some(vec![SchemaAttribute::string("city")])),
            ]),
        )];
        let payload = json!({"customer": {"id": 1, "address": {"zip": "560001"}}});
        let violations = validate(&payload, STRICT, &attributes);

        assert_eq!(
            paths(&violations),
            vec!["customer.id", "customer.address.zip", "customer.address.city"]
        );
        assert_eq!(violations[1].message, "Unexpected field: zip");
        assert_eq!(violations[2].message, "Missing required field: city");
    }

    #[test]
    fn mismatch_stops_recursion() {
        let attributes = vec![SchemaAttribute::object(
            "customer",
            Some(vec![SchemaAttribute::string("id")]),
        )];
        let violations = validate(&json!({"customer": [1, 2]}), MATCHING, &attributes);

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Type mismatch for field: customer. Expected: OBJECT, Found: ARRAY"
        );
    }

    #[test]
    fn untyped_object_accepts_any_kind() {
        let attributes = vec![SchemaAttribute::object("payload", None)];
        for value in [json!(1), json!("x"), json!([1]), json!({"deep": {"x": 1}})] {
            assert!(validate(&json!({ "payload": value }), STRICT, &attributes).is_empty());
        }
    }

    #[test]
    fn array_elements_are_indexed() {
        let attributes = vec![SchemaAttribute::array(
            "items",
            Some(SchemaAttribute::object(
                "item",
                Some(vec![SchemaAttribute::integer("qty")]),
            )),
        )];
        let payload = json!({"items": [{"qty": 1}, {"qty": "two"}, {}]});
        let violations = validate(&payload, MATCHING, &attributes);

        assert_eq!(paths(&violations), vec!["items[1].qty", "items[2].qty"]);
        assert_eq!(
            messages(&violations),
            vec![
                "Type mismatch for field: qty. Expected: INTEGER, Found: STRING",
                "Missing required field: qty"
            ]
        );
    }

    #[test]
    fn nested_arrays_stack_indices() {
        let attributes = vec![SchemaAttribute::array(
            "matrix",
            Some(SchemaAttribute::array("row", Some(SchemaAttribute::string("cell")))),
        )];
        let violations = validate(&json!({"matrix": [["a"], ["b", 3]]}), MATCHING, &attributes);

        assert_eq!(paths(&violations), vec!["matrix[1][1]"]);
    }

    #[test]
    fn raw_containers_skip_element_checks() {
        let attributes = vec![
            SchemaAttribute::array("list", None),
            SchemaAttribute::map("map", None, None),
        ];
        let payload = json!({"list": [1, "two", {"three": 3}], "map": {"a": [1], "b": null}});
        assert!(validate(&payload, STRICT, &attributes).is_empty());

        let wrong_kind = validate(&json!({"list": {}, "map": []}), MATCHING, &attributes);
        assert_eq!(paths(&wrong_kind), vec!["list", "map"]);
    }

    #[test]
    fn map_entries_validate_key_and_value() {
        let attributes = vec![SchemaAttribute::map(
            "labels",
            Some(SchemaAttribute::enumeration("key", ["env", "team"])),
            Some(SchemaAttribute::string("value")),
        )];
        let payload = json!({"labels": {"env": "prod", "owner": "ops", "team": 7}});
        let violations = validate(&payload, MATCHING, &attributes);

        assert_eq!(
            paths(&violations),
            vec!["labels['owner'].key", "labels['team'].value"]
        );
    }

    #[test]
    fn unreadable_numeric_key_is_reported_as_missing_key() {
        let attributes = vec![SchemaAttribute::map(
            "counts",
            Some(SchemaAttribute::integer("key")),
            Some(SchemaAttribute::long("value")),
        )];
        let valid = validate(&json!({"counts": {"1": 10, "2": 20}}), MATCHING, &attributes);
        assert!(valid.is_empty());

        let violations = validate(&json!({"counts": {"one": 10}}), MATCHING, &attributes);
        assert_eq!(
            messages(&violations),
            vec!["Key not present for map attribute field: counts"]
        );
        assert_eq!(paths(&violations), vec!["counts"]);
    }

    #[test]
    fn scalar_payload_is_checked_directly() {
        let attributes = vec![SchemaAttribute::integer("value")];
        assert!(validate(&json!(5), MATCHING, &attributes).is_empty());

        let violations = validate(&json!("five"), MATCHING, &attributes);
        assert_eq!(paths(&violations), vec![""]);
    }

    #[test]
    fn parameterized_delegates_to_raw_type() {
        let attributes = vec![SchemaAttribute::new(
            "page",
            AttributeKind::Parameterized {
                raw_type_attribute: Some(Box::new(SchemaAttribute::object(
                    "page",
                    Some(vec![
                        SchemaAttribute::integer("size"),
                        SchemaAttribute::new("items", AttributeKind::Type),
                    ]),
                ))),
                type_attributes: vec![SchemaAttribute::string("T")],
            },
        )];

        let valid = json!({"page": {"size": 1, "items": [1, "x"]}});
        assert!(validate(&valid, MATCHING, &attributes).is_empty());
        let violations = validate(&json!({"page": {"items": []}}), MATCHING, &attributes);
        assert_eq!(paths(&violations), vec!["page.size"]);
    }

    #[test]
    fn qualifiers_are_not_enforced() {
        let attributes = vec![SchemaAttribute::string("ssn")
            .with_qualifier(QualifierInfo::Pii)
            .with_qualifier(QualifierInfo::ShortLived { ttl_seconds: 1 })];
        assert!(validate(&json!({"ssn": "123"}), STRICT, &attributes).is_empty());
    }

    #[test]
    fn validation_is_idempotent() {
        let attributes = vec![
            SchemaAttribute::integer("a"),
            SchemaAttribute::map(
                "m",
                Some(SchemaAttribute::string("k")),
                Some(SchemaAttribute::boolean("v")),
            ),
        ];
        let payload = json!({"a": "x", "m": {"k1": 1, "k2": true}, "z": 0});

        let first = validate(&payload, STRICT, &attributes);
        let second = validate(&payload, STRICT, &attributes);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn validate_at_prefixes_paths() {
        let violations = validate_at(
            &json!({}),
            MATCHING,
            &[SchemaAttribute::string("id")],
            "envelope.body",
        );
        assert_eq!(paths(&violations), vec!["envelope.body.id"]);
    }
}
