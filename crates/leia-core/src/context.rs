use leia_models::{
    CreateSchemaRequest, SchemaDetails, SchemaEvent, SchemaKey, SchemaUpdater,
    UpdateSchemaRequest,
};

/// The request driving one lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRequest {
    Create(CreateSchemaRequest),
    Update(UpdateSchemaRequest),
    Approve(SchemaKey),
    Reject(SchemaKey),
}

impl SchemaRequest {
    pub fn event(&self) -> SchemaEvent {
        match self {
            SchemaRequest::Create(_) => SchemaEvent::CreateSchema,
            SchemaRequest::Update(_) => SchemaEvent::UpdateSchema,
            SchemaRequest::Approve(_) => SchemaEvent::ApproveSchema,
            SchemaRequest::Reject(_) => SchemaEvent::RejectSchema,
        }
    }
}

/// Input and output of a single processor invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaContext {
    pub request: SchemaRequest,
    pub updater: SchemaUpdater,
    /// Set by the processor to the record it produced or changed.
    pub schema_details: Option<SchemaDetails>,
}

impl SchemaContext {
    pub fn new(request: SchemaRequest, updater: SchemaUpdater) -> Self {
        Self {
            request,
            updater,
            schema_details: None,
        }
    }

    pub fn event(&self) -> SchemaEvent {
        self.request.event()
    }
}
