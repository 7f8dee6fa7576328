use std::collections::HashMap;

use leia_models::{SchemaDetails, SchemaKey, TransformationTarget};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::error::TransformationError;
use crate::path::CompiledPath;
use crate::target::CompiledCriteria;
use crate::validity::SchemaKeyValidator;

/// Why a schema snapshot could not be indexed.
///
/// Kept apart from [`TransformationError`] so a failed setup can be cached
/// and reported again without rebuilding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("transformation target {target} of source {source_key} is not a valid schema")]
    InvalidTargetSchema {
        source_key: SchemaKey,
        target: SchemaKey,
    },

    #[error("invalid path {expression:?} for {schema_key}: {message}")]
    PathCompileFailed {
        schema_key: SchemaKey,
        expression: String,
        message: String,
    },
}

impl From<IndexError> for TransformationError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidTargetSchema { source_key, target } => {
                TransformationError::InvalidTargetSchema { source_key, target }
            }
            IndexError::PathCompileFailed {
                schema_key,
                expression,
                message,
            } => TransformationError::PathCompileFailed {
                schema_key,
                expression,
                message,
            },
        }
    }
}

/// A transformation target with its criteria and transformer paths compiled.
#[derive(Debug, Clone)]
pub struct CompiledTarget {
    pub target: TransformationTarget,
    criteria: Option<CompiledCriteria>,
    paths: Vec<(String, CompiledPath)>,
}

impl CompiledTarget {
    fn compile(target: &TransformationTarget) -> Result<Self, IndexError> {
        let compile = |expression: &str| {
            CompiledPath::compile(expression).map_err(|err| IndexError::PathCompileFailed {
                schema_key: target.schema_key.clone(),
                expression: expression.to_owned(),
                message: err.to_string(),
            })
        };

        let criteria = target
            .criteria
            .as_ref()
            .map(|criteria| CompiledCriteria::compile(criteria, &compile))
            .transpose()?;
        let paths = target
            .transformers
            .iter()
            .map(|transformer| {
                Ok((
                    transformer.attribute_name.clone(),
                    compile(&transformer.transformation_path)?,
                ))
            })
            .collect::<Result<Vec<_>, IndexError>>()?;

        Ok(Self {
            target: target.clone(),
            criteria,
            paths,
        })
    }

    /// Eligibility rule of this target, if it declares one.
    pub fn criteria(&self) -> Option<&CompiledCriteria> {
        self.criteria.as_ref()
    }

    /// Build the target payload from `source`, omitting attributes whose path
    /// matches nothing.
    pub fn extract(&self, source: &Value) -> Value {
        let mut payload = Map::new();
        for (attribute, path) in &self.paths {
            if let Some(value) = path.extract(source) {
                payload.insert(attribute.clone(), value);
            }
        }
        Value::Object(payload)
    }
}

/// Lookup structures derived from one schema snapshot.
#[derive(Debug, Default)]
pub struct SchemaIndex {
    schemas: HashMap<SchemaKey, SchemaDetails>,
    targets: HashMap<SchemaKey, Vec<CompiledTarget>>,
}

impl SchemaIndex {
    /// Index `schemas`, compiling the targets of every valid source.
    ///
    /// A valid source naming an invalid target, or a path that does not
    /// compile, fails the whole build.
    pub fn build(
        schemas: &[SchemaDetails],
        validity: &dyn SchemaKeyValidator,
    ) -> Result<Self, IndexError> {
        let mut index = Self::default();
        for details in schemas {
            index
                .schemas
                .insert(details.schema_key.clone(), details.clone());
        }

        for details in schemas.iter().filter(|d| validity.valid(&d.schema_key)) {
            let mut compiled = Vec::with_capacity(details.transformation_targets.len());
            for target in &details.transformation_targets {
                if !validity.valid(&target.schema_key) {
                    error!(
                        source = %details.schema_key,
                        target = %target.schema_key,
                        "transformation target is not a valid schema, check the schema bindings"
                    );
                    return Err(IndexError::InvalidTargetSchema {
                        source_key: details.schema_key.clone(),
                        target: target.schema_key.clone(),
                    });
                }
                compiled.push(CompiledTarget::compile(target)?);
            }
            index.targets.insert(details.schema_key.clone(), compiled);
        }

        info!(
            schemas = index.schemas.len(),
            sources = index.targets.len(),
            "schema index built"
        );
        Ok(index)
    }

    pub fn schema(&self, key: &SchemaKey) -> Option<&SchemaDetails> {
        self.schemas.get(key)
    }

    /// Compiled targets of `source`, in declared order.
    pub fn targets(&self, source: &SchemaKey) -> &[CompiledTarget] {
        self.targets.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
