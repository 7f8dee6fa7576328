use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use leia_models::{SchemaDetails, SchemaKey, SchemaState, SearchRequest};

use crate::error::{LeiaError, Result};

/// Storage contract the lifecycle processors write through.
///
/// Implementations are expected to serialize writes per record.
pub trait SchemaRepository: Send + Sync {
    /// Whether any version of the schema is currently in CREATED state.
    fn created_record_exists(&self, namespace: &str, schema_name: &str) -> Result<bool>;

    fn create(&self, details: &SchemaDetails) -> Result<()>;

    fn update(&self, details: &SchemaDetails) -> Result<()>;

    fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>>;

    /// Records in any of `namespaces` and `states`; an empty set matches all.
    fn get_schemas(
        &self,
        namespaces: &BTreeSet<String>,
        states: &BTreeSet<SchemaState>,
    ) -> Result<Vec<SchemaDetails>>;
}

/// Repository backed by a process-local map, keyed by reference id.
#[derive(Debug, Default)]
pub struct InMemorySchemaRepository {
    records: RwLock<BTreeMap<String, SchemaDetails>>,
}

impl InMemorySchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing records.
    pub fn with_records(records: impl IntoIterator<Item = SchemaDetails>) -> Self {
        let records = records
            .into_iter()
            .map(|details| (details.reference_id(), details))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<SchemaDetails>> {
        Ok(self
            .read()?
            .values()
            .filter(|details| request.matches(details))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, SchemaDetails>>> {
        self.records
            .read()
            .map_err(|_| LeiaError::Repository("schema store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, SchemaDetails>>> {
        self.records
            .write()
            .map_err(|_| LeiaError::Repository("schema store lock poisoned".into()))
    }
}

impl SchemaRepository for InMemorySchemaRepository {
    fn created_record_exists(&self, namespace: &str, schema_name: &str) -> Result<bool> {
        Ok(self.read()?.values().any(|details| {
            details.schema_state == SchemaState::Created
                && details.schema_key.namespace == namespace
                && details.schema_key.schema_name == schema_name
        }))
    }

    fn create(&self, details: &SchemaDetails) -> Result<()> {
        let reference_id = details.reference_id();
        let mut records = self.write()?;
        if records.contains_key(&reference_id) {
            return Err(LeiaError::Repository(format!(
                "record already stored: {reference_id}"
            )));
        }
        records.insert(reference_id, details.clone());
        Ok(())
    }

    fn update(&self, details: &SchemaDetails) -> Result<()> {
        let reference_id = details.reference_id();
        let mut records = self.write()?;
        match records.get_mut(&reference_id) {
            Some(stored) => {
                *stored = details.clone();
                Ok(())
            }
            None => Err(LeiaError::Repository(format!(
                "record not stored: {reference_id}"
            ))),
        }
    }

    fn get(&self, key: &SchemaKey) -> Result<Option<SchemaDetails>> {
        Ok(self.read()?.get(&key.reference_id()).cloned())
    }

    fn get_schemas(
        &self,
        namespaces: &BTreeSet<String>,
        states: &BTreeSet<SchemaState>,
    ) -> Result<Vec<SchemaDetails>> {
        self.search(&SearchRequest {
            namespaces: namespaces.clone(),
            states: states.clone(),
            ..SearchRequest::default()
        })
    }
}
