use std::collections::HashSet;

use leia_models::SchemaKey;

/// Decides which schemas this process may produce messages for.
pub trait SchemaKeyValidator: Send + Sync {
    fn valid(&self, schema_key: &SchemaKey) -> bool;
}

/// Every schema is valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllSchemasValid;

impl SchemaKeyValidator for AllSchemasValid {
    fn valid(&self, _: &SchemaKey) -> bool {
        true
    }
}

/// Only explicitly registered schema keys are valid.
#[derive(Debug, Clone, Default)]
pub struct RegisteredSchemas {
    keys: HashSet<SchemaKey>,
}

impl RegisteredSchemas {
    pub fn new(keys: impl IntoIterator<Item = SchemaKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn register(&mut self, key: SchemaKey) {
        self.keys.insert(key);
    }
}

impl SchemaKeyValidator for RegisteredSchemas {
    fn valid(&self, schema_key: &SchemaKey) -> bool {
        self.keys.contains(schema_key)
    }
}
