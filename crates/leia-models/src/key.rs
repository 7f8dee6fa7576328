use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable identity of a schema version.
///
/// Equality is structural over all six fields, which makes the key usable as
/// a map key across the registry, the multiplexer and the dispatch layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaKey {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub tenant_id: String,
    pub namespace: String,
    pub schema_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub key_type: String,
}

impl SchemaKey {
    pub fn new(
        namespace: impl Into<String>,
        schema_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            schema_name: schema_name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = org_id.into();
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    pub fn with_type(mut self, key_type: impl Into<String>) -> Self {
        self.key_type = key_type.into();
        self
    }

    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Canonical storage key: `orgId.namespace.tenantId.schemaName.version`.
    pub fn reference_id(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            self.org_id, self.namespace, self.tenant_id, self.schema_name, self.version
        )
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference_id())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn reference_id_joins_identity_fields() {
        let key = SchemaKey::new("payments", "refund", "V1")
            .with_org("acme")
            .with_tenant("eu");
        assert_eq!(key.reference_id(), "acme.payments.eu.refund.V1");
        assert_eq!(key.to_string(), key.reference_id());
    }

    #[test]
    fn structural_equality_drives_map_lookup() {
        let mut map = HashMap::new();
        map.insert(SchemaKey::new("ns", "a", "V1"), 1);

        assert_eq!(map.get(&SchemaKey::new("ns", "a", "V1")), Some(&1));
        assert_eq!(map.get(&SchemaKey::new("ns", "a", "V2")), None);
        assert_eq!(map.get(&SchemaKey::new("ns", "a", "V1").with_type("avro")), None);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let key: SchemaKey = serde_json::from_str(
            r#"{"orgId":"o","tenantId":"t","namespace":"n","schemaName":"s","version":"V1","type":"default"}"#,
        )
        .unwrap();
        assert_eq!(key.key_type, "default");
        assert_eq!(key.schema_name, "s");

        let minimal: SchemaKey =
            serde_json::from_str(r#"{"namespace":"n","schemaName":"s"}"#).unwrap();
        assert!(minimal.version.is_empty());
    }
}
