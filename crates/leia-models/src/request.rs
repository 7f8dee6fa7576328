use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::attributes::SchemaAttribute;
use crate::key::SchemaKey;
use crate::schema::{
    SchemaDetails, SchemaState, SchemaType, SchemaValidationType, TransformationTarget,
};

/// Identity of the actor performing a registry change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaUpdater {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl SchemaUpdater {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Payload of a CREATE_SCHEMA event.
///
/// An empty `schema_key.version` is filled in by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchemaRequest {
    pub schema_key: SchemaKey,
    #[serde(default)]
    pub description: String,
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
}

impl CreateSchemaRequest {
    pub fn new(schema_key: SchemaKey, attributes: Vec<SchemaAttribute>) -> Self {
        Self {
            schema_key,
            description: String::new(),
            schema_type: SchemaType::default(),
            validation_type: SchemaValidationType::default(),
            attributes,
            transformation_targets: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Build the CREATED record this request describes, without history.
    pub fn to_schema_details(&self) -> SchemaDetails {
        SchemaDetails {
            schema_key: self.schema_key.clone(),
            description: self.description.clone(),
            schema_state: SchemaState::Created,
            schema_type: self.schema_type,
            validation_type: self.validation_type,
            attributes: self.attributes.clone(),
            transformation_targets: self.transformation_targets.clone(),
            tags: self.tags.clone(),
            history: Vec::new(),
        }
    }
}

/// Payload of an UPDATE_SCHEMA event; replaces the mutable parts of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchemaRequest {
    pub schema_key: SchemaKey,
    #[serde(default)]
    pub description: String,
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
}

impl UpdateSchemaRequest {
    pub fn new(schema_key: SchemaKey, attributes: Vec<SchemaAttribute>) -> Self {
        Self {
            schema_key,
            description: String::new(),
            schema_type: SchemaType::default(),
            validation_type: SchemaValidationType::default(),
            attributes,
            transformation_targets: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Overwrite the mutable parts of `details` with this request.
    pub fn apply_to(&self, details: &mut SchemaDetails) {
        details.description = self.description.clone();
        details.schema_type = self.schema_type;
        details.validation_type = self.validation_type;
        details.attributes = self.attributes.clone();
        details.transformation_targets = self.transformation_targets.clone();
        details.tags = self.tags.clone();
    }
}

/// Filter over stored schema records. Empty sets match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    #[serde(alias = "orgs")]
    pub org_ids: BTreeSet<String>,
    pub tenants: BTreeSet<String>,
    pub namespaces: BTreeSet<String>,
    pub schema_names: BTreeSet<String>,
    pub states: BTreeSet<SchemaState>,
}

impl SearchRequest {
    pub fn matches(&self, details: &SchemaDetails) -> bool {
        let key = &details.schema_key;
        admits(&self.org_ids, &key.org_id)
            && admits(&self.tenants, &key.tenant_id)
            && admits(&self.namespaces, &key.namespace)
            && admits(&self.schema_names, &key.schema_name)
            && (self.states.is_empty() || self.states.contains(&details.schema_state))
    }
}

fn admits(filter: &BTreeSet<String>, value: &str) -> bool {
    filter.is_empty() || filter.contains(value)
}
