use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use leia_models::{LeiaMessage, MessageRequest, SchemaDetails, SchemaKey};
use leia_processor::{AllowAllBackendFilter, BackendFilter, MessageProcessor};
use leia_refresher::DataProvider;
use leia_validator::{MessageValidator, NoOpMessageValidator};
use tracing::debug;

use crate::error::{Result, TransformationError};
use crate::index::{IndexError, SchemaIndex};
use crate::target::{AlwaysEligible, TargetValidator};
use crate::validity::{AllSchemasValid, SchemaKeyValidator};

/// Setup result for one snapshot, failed or not.
struct IndexedSnapshot {
    snapshot: Arc<Vec<SchemaDetails>>,
    index: std::result::Result<SchemaIndex, IndexError>,
}

impl IndexedSnapshot {
    fn index(&self) -> Result<&SchemaIndex> {
        self.index.as_ref().map_err(|err| err.clone().into())
    }
}

/// Derives target messages from source messages and hands them to dispatch.
///
/// Schemas come from a [`DataProvider`]; the compiled index is rebuilt
/// whenever the provider publishes a new snapshot.
pub struct LeiaClient {
    provider: Arc<dyn DataProvider<Vec<SchemaDetails>>>,
    schema_validity: Arc<dyn SchemaKeyValidator>,
    message_validator: Arc<dyn MessageValidator>,
    target_validator: Arc<dyn TargetValidator>,
    message_processor: Option<Arc<dyn MessageProcessor>>,
    backend_filter: Arc<dyn BackendFilter>,
    empty: Arc<Vec<SchemaDetails>>,
    indexed: ArcSwapOption<IndexedSnapshot>,
}

impl LeiaClient {
    /// Client with permissive defaults: every schema valid, no payload
    /// validation, every target eligible, every backend allowed.
    pub fn new(provider: Arc<dyn DataProvider<Vec<SchemaDetails>>>) -> Self {
        Self {
            provider,
            schema_validity: Arc::new(AllSchemasValid),
            message_validator: Arc::new(NoOpMessageValidator),
            target_validator: Arc::new(AlwaysEligible),
            message_processor: None,
            backend_filter: Arc::new(AllowAllBackendFilter),
            empty: Arc::new(Vec::new()),
            indexed: ArcSwapOption::empty(),
        }
    }

    pub fn with_message_validator(mut self, validator: Arc<dyn MessageValidator>) -> Self {
        self.message_validator = validator;
        self
    }

    /// Eligibility check for targets that carry no criteria of their own.
    pub fn with_target_validator(mut self, validator: Arc<dyn TargetValidator>) -> Self {
        self.target_validator = validator;
        self
    }

    pub fn with_schema_validity(mut self, validity: Arc<dyn SchemaKeyValidator>) -> Self {
        self.schema_validity = validity;
        self
    }

    pub fn with_message_processor(mut self, processor: Arc<dyn MessageProcessor>) -> Self {
        self.message_processor = Some(processor);
        self
    }

    pub fn with_backend_filter(mut self, filter: Arc<dyn BackendFilter>) -> Self {
        self.backend_filter = filter;
        self
    }

    /// Build the index for the current snapshot, surfacing configuration
    /// errors before the first request.
    pub fn start(&self) -> Result<()> {
        self.snapshot_index().index().map(|_| ())
    }

    /// Number of schemas in the currently indexed snapshot.
    pub fn schema_count(&self) -> Result<usize> {
        Ok(self.snapshot_index().index()?.len())
    }

    /// Setup for the provider's current snapshot, built at most once per
    /// snapshot whether it succeeds or fails.
    fn snapshot_index(&self) -> Arc<IndexedSnapshot> {
        let snapshot = self.provider.data().unwrap_or_else(|| self.empty.clone());
        if let Some(indexed) = self.indexed.load_full() {
            if Arc::ptr_eq(&indexed.snapshot, &snapshot) {
                return indexed;
            }
        }

        let index = SchemaIndex::build(&snapshot, self.schema_validity.as_ref());
        let indexed = Arc::new(IndexedSnapshot { snapshot, index });
        self.indexed.store(Some(indexed.clone()));
        indexed
    }

    /// Derive every eligible target message for `request`.
    ///
    /// `target_validator` overrides the configured one for targets without
    /// criteria. A missing source or target schema and any validation
    /// violation fail the whole call.
    pub fn multiplex(
        &self,
        request: &MessageRequest,
        target_validator: Option<&dyn TargetValidator>,
    ) -> Result<BTreeMap<SchemaKey, LeiaMessage>> {
        let indexed = self.snapshot_index();
        let index = indexed.index()?;
        let source = index
            .schema(&request.schema_key)
            .ok_or_else(|| TransformationError::NoSchemaFound(request.schema_key.clone()))?;

        let mut messages = BTreeMap::new();
        if request.include_source {
            messages.insert(
                request.schema_key.clone(),
                LeiaMessage::new(request.schema_key.clone(), request.message.clone())
                    .with_tags(source.tags.iter().cloned()),
            );
        }

        let default_validator: &dyn TargetValidator = match target_validator {
            Some(validator) => validator,
            None => self.target_validator.as_ref(),
        };
        for compiled in index.targets(&request.schema_key) {
            let target = &compiled.target;
            let eligible = match compiled.criteria() {
                Some(criteria) => criteria.matches(&request.message),
                None => default_validator.validate(target, request, source),
            };
            if !eligible {
                debug!(
                    source = %request.schema_key,
                    target = %target.schema_key,
                    "target not eligible, skipping"
                );
                continue;
            }

            let target_schema = index.schema(&target.schema_key).ok_or_else(|| {
                TransformationError::TargetSchemaNotFound {
                    source_key: request.schema_key.clone(),
                    target: target.schema_key.clone(),
                }
            })?;

            let payload = compiled.extract(&request.message);
            let violations = self.message_validator.validate(target_schema, &payload);
            if !violations.is_empty() {
                return Err(TransformationError::ValidationFailed {
                    schema_key: target.schema_key.clone(),
                    violations,
                });
            }

            let message = LeiaMessage::new(target.schema_key.clone(), payload)
                .with_tags(target_schema.tags.iter().cloned())
                .with_tags(target.tags.iter().cloned());
            messages.insert(target.schema_key.clone(), message);
        }
        Ok(messages)
    }

    /// [`multiplex`](Self::multiplex) over a raw JSON payload.
    pub fn multiplex_bytes(
        &self,
        schema_key: SchemaKey,
        payload: &[u8],
        include_source: bool,
        target_validator: Option<&dyn TargetValidator>,
    ) -> Result<BTreeMap<SchemaKey, LeiaMessage>> {
        let mut request = MessageRequest::new(schema_key, serde_json::from_slice(payload)?);
        request.include_source = include_source;
        self.multiplex(&request, target_validator)
    }

    /// Multiplex `request` and dispatch the produced messages.
    ///
    /// Arguments left as `None` fall back to the client's configuration.
    pub fn process_messages(
        &self,
        request: &MessageRequest,
        processor: Option<&dyn MessageProcessor>,
        target_validator: Option<&dyn TargetValidator>,
        filter: Option<&dyn BackendFilter>,
    ) -> Result<()> {
        let processor: &dyn MessageProcessor = match processor {
            Some(processor) => processor,
            None => self
                .message_processor
                .as_deref()
                .ok_or(TransformationError::NoMessageProcessor)?,
        };
        let messages: Vec<LeiaMessage> = self
            .multiplex(request, target_validator)?
            .into_values()
            .collect();
        let filter: &dyn BackendFilter = match filter {
            Some(filter) => filter,
            None => self.backend_filter.as_ref(),
        };
        processor.process_messages(&messages, filter)?;
        Ok(())
    }
}
