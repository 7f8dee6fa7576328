use std::collections::HashMap;
use std::sync::Arc;

use leia_models::SchemaEvent;

use crate::processors::{
    ApproveSchemaProcessor, CreateSchemaProcessor, RejectSchemaProcessor, SchemaProcessor,
    UpdateSchemaProcessor,
};
use crate::repository::SchemaRepository;
use crate::version::VersionIdGenerator;

/// Looks up the processor owning an event.
pub trait SchemaProcessorHub: Send + Sync {
    fn processor(&self, event: SchemaEvent) -> Option<Arc<dyn SchemaProcessor>>;
}

/// Event-keyed processor table.
#[derive(Default)]
pub struct DefaultProcessorHub {
    processors: HashMap<SchemaEvent, Arc<dyn SchemaProcessor>>,
}

impl DefaultProcessorHub {
    /// Hub with the four lifecycle processors wired to `repository`.
    pub fn new(
        repository: Arc<dyn SchemaRepository>,
        versions: Arc<dyn VersionIdGenerator>,
    ) -> Self {
        Self::empty()
            .register(Arc::new(CreateSchemaProcessor::new(
                repository.clone(),
                versions.clone(),
            )))
            .register(Arc::new(UpdateSchemaProcessor::new(
                repository.clone(),
                versions,
            )))
            .register(Arc::new(ApproveSchemaProcessor::new(repository.clone())))
            .register(Arc::new(RejectSchemaProcessor::new(repository)))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Register `processor` under its own event, replacing any previous one.
    pub fn register(mut self, processor: Arc<dyn SchemaProcessor>) -> Self {
        self.processors.insert(processor.name(), processor);
        self
    }
}

impl SchemaProcessorHub for DefaultProcessorHub {
    fn processor(&self, event: SchemaEvent) -> Option<Arc<dyn SchemaProcessor>> {
        self.processors.get(&event).cloned()
    }
}
