//! Recursive attribute model.
//!
//! A schema is a list of [`SchemaAttribute`]s. Container attributes nest
//! further attributes; a container whose nested reference is absent is a
//! "raw" container and accepts any value of the matching JSON kind.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::qualifier::QualifierInfo;

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAttribute {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub qualifiers: BTreeSet<QualifierInfo>,
    #[serde(flatten)]
    pub kind: AttributeKind,
}

/// The sixteen attribute variants, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeKind {
    Boolean,
    #[serde(rename = "BYTES")]
    Byte,
    Character,
    Double,
    Enum {
        #[serde(default, deserialize_with = "null_as_default")]
        values: BTreeSet<String>,
    },
    Float,
    Integer,
    Long,
    Short,
    String,
    Date,
    #[serde(rename_all = "camelCase")]
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element_attribute: Option<Box<SchemaAttribute>>,
    },
    #[serde(rename_all = "camelCase")]
    Map {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_attribute: Option<Box<SchemaAttribute>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_attribute: Option<Box<SchemaAttribute>>,
    },
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nested_attributes: Option<Vec<SchemaAttribute>>,
    },
    #[serde(rename_all = "camelCase")]
    Parameterized {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_type_attribute: Option<Box<SchemaAttribute>>,
        #[serde(default, deserialize_with = "null_as_default")]
        type_attributes: Vec<SchemaAttribute>,
    },
    Type,
}

/// Payload-free discriminator of an [`AttributeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Boolean,
    #[serde(rename = "BYTES")]
    Byte,
    Character,
    Double,
    Enum,
    Float,
    Integer,
    Long,
    Short,
    String,
    Date,
    Array,
    Map,
    Object,
    Parameterized,
    Type,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Byte => "BYTES",
            DataType::Character => "CHARACTER",
            DataType::Double => "DOUBLE",
            DataType::Enum => "ENUM",
            DataType::Float => "FLOAT",
            DataType::Integer => "INTEGER",
            DataType::Long => "LONG",
            DataType::Short => "SHORT",
            DataType::String => "STRING",
            DataType::Date => "DATE",
            DataType::Array => "ARRAY",
            DataType::Map => "MAP",
            DataType::Object => "OBJECT",
            DataType::Parameterized => "PARAMETERIZED",
            DataType::Type => "TYPE",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-variant dispatch over [`SchemaAttribute`].
///
/// Implementors must handle every variant, so adding a variant breaks every
/// algorithm that has not been taught about it yet.
pub trait SchemaAttributeVisitor<T> {
    fn visit_boolean(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_byte(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_character(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_double(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_enum(&mut self, attribute: &SchemaAttribute, values: &BTreeSet<String>) -> T;
    fn visit_float(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_integer(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_long(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_short(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_string(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_date(&mut self, attribute: &SchemaAttribute) -> T;
    fn visit_array(&mut self, attribute: &SchemaAttribute, element: Option<&SchemaAttribute>)
        -> T;
    fn visit_map(
        &mut self,
        attribute: &SchemaAttribute,
        key: Option<&SchemaAttribute>,
        value: Option<&SchemaAttribute>,
    ) -> T;
    fn visit_object(&mut self, attribute: &SchemaAttribute, nested: Option<&[SchemaAttribute]>)
        -> T;
    fn visit_parameterized(
        &mut self,
        attribute: &SchemaAttribute,
        raw_type: Option<&SchemaAttribute>,
        type_arguments: &[SchemaAttribute],
    ) -> T;
    fn visit_type(&mut self, attribute: &SchemaAttribute) -> T;
}

impl SchemaAttribute {
    /// Create a required attribute with no qualifiers.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            optional: false,
            qualifiers: BTreeSet::new(),
            kind,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Boolean)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Integer)
    }

    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Long)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Double)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::String)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            AttributeKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Array attribute; `None` element makes it a raw collection.
    pub fn array(name: impl Into<String>, element: Option<SchemaAttribute>) -> Self {
        Self::new(
            name,
            AttributeKind::Array {
                element_attribute: element.map(Box::new),
            },
        )
    }

    /// Map attribute; `None` for both sides makes it a raw map.
    pub fn map(
        name: impl Into<String>,
        key: Option<SchemaAttribute>,
        value: Option<SchemaAttribute>,
    ) -> Self {
        Self::new(
            name,
            AttributeKind::Map {
                key_attribute: key.map(Box::new),
                value_attribute: value.map(Box::new),
            },
        )
    }

    /// Object attribute; `None` accepts any value.
    pub fn object(name: impl Into<String>, nested: Option<Vec<SchemaAttribute>>) -> Self {
        Self::new(
            name,
            AttributeKind::Object {
                nested_attributes: nested,
            },
        )
    }

    /// Mark the attribute optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_qualifier(mut self, qualifier: QualifierInfo) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    pub fn data_type(&self) -> DataType {
        match &self.kind {
            AttributeKind::Boolean => DataType::Boolean,
            AttributeKind::Byte => DataType::Byte,
            AttributeKind::Character => DataType::Character,
            AttributeKind::Double => DataType::Double,
            AttributeKind::Enum { .. } => DataType::Enum,
            AttributeKind::Float => DataType::Float,
            AttributeKind::Integer => DataType::Integer,
            AttributeKind::Long => DataType::Long,
            AttributeKind::Short => DataType::Short,
            AttributeKind::String => DataType::String,
            AttributeKind::Date => DataType::Date,
            AttributeKind::Array { .. } => DataType::Array,
            AttributeKind::Map { .. } => DataType::Map,
            AttributeKind::Object { .. } => DataType::Object,
            AttributeKind::Parameterized { .. } => DataType::Parameterized,
            AttributeKind::Type => DataType::Type,
        }
    }

    /// Dispatch to the visitor method for this attribute's variant.
    pub fn accept<T, V>(&self, visitor: &mut V) -> T
    where
        V: SchemaAttributeVisitor<T> + ?Sized,
    {
        match &self.kind {
            AttributeKind::Boolean => visitor.visit_boolean(self),
            AttributeKind::Byte => visitor.visit_byte(self),
            AttributeKind::Character => visitor.visit_character(self),
            AttributeKind::Double => visitor.visit_double(self),
            AttributeKind::Enum { values } => visitor.visit_enum(self, values),
            AttributeKind::Float => visitor.visit_float(self),
            AttributeKind::Integer => visitor.visit_integer(self),
            AttributeKind::Long => visitor.visit_long(self),
            AttributeKind::Short => visitor.visit_short(self),
            AttributeKind::String => visitor.visit_string(self),
            AttributeKind::Date => visitor.visit_date(self),
            AttributeKind::Array { element_attribute } => {
                visitor.visit_array(self, element_attribute.as_deref())
            }
            AttributeKind::Map {
                key_attribute,
                value_attribute,
            } => visitor.visit_map(self, key_attribute.as_deref(), value_attribute.as_deref()),
            AttributeKind::Object { nested_attributes } => {
                visitor.visit_object(self, nested_attributes.as_deref())
            }
            AttributeKind::Parameterized {
                raw_type_attribute,
                type_attributes,
            } => visitor.visit_parameterized(self, raw_type_attribute.as_deref(), type_attributes),
            AttributeKind::Type => visitor.visit_type(self),
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
