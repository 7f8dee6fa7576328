//! One processor per lifecycle event.
//!
//! Every successful processor appends exactly one history item to the record
//! it touches and leaves that record in [`SchemaContext::schema_details`].

use std::sync::Arc;

use chrono::Utc;
use leia_models::{
    SchemaDetails, SchemaEvent, SchemaHistoryItem, SchemaKey, SchemaState, SchemaUpdater,
};
use tracing::debug;

use crate::context::{SchemaContext, SchemaRequest};
use crate::error::{LeiaError, Result};
use crate::repository::SchemaRepository;
use crate::version::VersionIdGenerator;

/// Handles one [`SchemaEvent`].
pub trait SchemaProcessor: Send + Sync {
    fn name(&self) -> SchemaEvent;

    fn process(&self, context: &mut SchemaContext) -> Result<()>;
}

fn add_history(details: &mut SchemaDetails, updater: &SchemaUpdater, event: SchemaEvent) {
    details.add_history(SchemaHistoryItem {
        updater_id: updater.user_id.clone(),
        updater_email: updater.email.clone(),
        updater_name: updater.name.clone(),
        timestamp: Utc::now().timestamp_millis(),
        event,
    });
    debug!(schema = %details.schema_key, %event, updater = %updater.email, "history appended");
}

fn ensure_no_created_record(repository: &dyn SchemaRepository, key: &SchemaKey) -> Result<()> {
    if repository.created_record_exists(&key.namespace, &key.schema_name)? {
        return Err(LeiaError::SchemaAlreadyExists {
            namespace: key.namespace.clone(),
            schema_name: key.schema_name.clone(),
        });
    }
    Ok(())
}

fn load(repository: &dyn SchemaRepository, key: &SchemaKey) -> Result<SchemaDetails> {
    repository
        .get(key)?
        .ok_or_else(|| LeiaError::NoSchemaFound(key.clone()))
}

fn ensure_created(details: &SchemaDetails, event: SchemaEvent) -> Result<()> {
    if details.schema_state != SchemaState::Created {
        return Err(LeiaError::InvalidStateTransition {
            schema_key: details.schema_key.clone(),
            state: details.schema_state,
            event,
        });
    }
    Ok(())
}

pub struct CreateSchemaProcessor {
    repository: Arc<dyn SchemaRepository>,
    versions: Arc<dyn VersionIdGenerator>,
}

impl CreateSchemaProcessor {
    pub fn new(
        repository: Arc<dyn SchemaRepository>,
        versions: Arc<dyn VersionIdGenerator>,
    ) -> Self {
        Self {
            repository,
            versions,
        }
    }
}

impl SchemaProcessor for CreateSchemaProcessor {
    fn name(&self) -> SchemaEvent {
        SchemaEvent::CreateSchema
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let SchemaRequest::Create(request) = &context.request else {
            return Err(LeiaError::ProcessorNotFound(context.event()));
        };
        ensure_no_created_record(self.repository.as_ref(), &request.schema_key)?;

        let mut details = request.to_schema_details();
        if details.schema_key.version.is_empty() {
            details.schema_key.version = self.versions.generate();
        }
        // An explicit version may name an APPROVED or REJECTED record.
        if self.repository.get(&details.schema_key)?.is_some() {
            return Err(LeiaError::SchemaAlreadyExists {
                namespace: details.schema_key.namespace.clone(),
                schema_name: details.schema_key.schema_name.clone(),
            });
        }
        add_history(&mut details, &context.updater, self.name());
        self.repository.create(&details)?;
        context.schema_details = Some(details);
        Ok(())
    }
}

/// Mutates a CREATED record, or forks an APPROVED one into a new version.
pub struct UpdateSchemaProcessor {
    repository: Arc<dyn SchemaRepository>,
    versions: Arc<dyn VersionIdGenerator>,
}

impl UpdateSchemaProcessor {
    pub fn new(
        repository: Arc<dyn SchemaRepository>,
        versions: Arc<dyn VersionIdGenerator>,
    ) -> Self {
        Self {
            repository,
            versions,
        }
    }
}

impl SchemaProcessor for UpdateSchemaProcessor {
    fn name(&self) -> SchemaEvent {
        SchemaEvent::UpdateSchema
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let SchemaRequest::Update(request) = &context.request else {
            return Err(LeiaError::ProcessorNotFound(context.event()));
        };
        let mut details = load(self.repository.as_ref(), &request.schema_key)?;

        match details.schema_state {
            SchemaState::Created => {
                request.apply_to(&mut details);
                add_history(&mut details, &context.updater, self.name());
                self.repository.update(&details)?;
            }
            SchemaState::Approved => {
                ensure_no_created_record(self.repository.as_ref(), &details.schema_key)?;
                details.schema_key = details.schema_key.with_version(self.versions.generate());
                details.schema_state = SchemaState::Created;
                request.apply_to(&mut details);
                add_history(&mut details, &context.updater, self.name());
                self.repository.create(&details)?;
            }
            SchemaState::Rejected => {
                return Err(LeiaError::InvalidStateTransition {
                    schema_key: details.schema_key,
                    state: SchemaState::Rejected,
                    event: self.name(),
                });
            }
        }

        context.schema_details = Some(details);
        Ok(())
    }
}

/// Moves a CREATED record to APPROVED; the last updater may not approve.
pub struct ApproveSchemaProcessor {
    repository: Arc<dyn SchemaRepository>,
}

impl ApproveSchemaProcessor {
    pub fn new(repository: Arc<dyn SchemaRepository>) -> Self {
        Self { repository }
    }
}

impl SchemaProcessor for ApproveSchemaProcessor {
    fn name(&self) -> SchemaEvent {
        SchemaEvent::ApproveSchema
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let SchemaRequest::Approve(key) = &context.request else {
            return Err(LeiaError::ProcessorNotFound(context.event()));
        };
        let mut details = load(self.repository.as_ref(), key)?;
        ensure_created(&details, self.name())?;

        let self_approval = details
            .last_history()
            .is_some_and(|item| item.updater_email == context.updater.email);
        if self_approval {
            return Err(LeiaError::ApprovalUnauthorized(details.schema_key));
        }

        details.schema_state = SchemaState::Approved;
        add_history(&mut details, &context.updater, self.name());
        self.repository.update(&details)?;
        context.schema_details = Some(details);
        Ok(())
    }
}

pub struct RejectSchemaProcessor {
    repository: Arc<dyn SchemaRepository>,
}

impl RejectSchemaProcessor {
    pub fn new(repository: Arc<dyn SchemaRepository>) -> Self {
        Self { repository }
    }
}

impl SchemaProcessor for RejectSchemaProcessor {
    fn name(&self) -> SchemaEvent {
        SchemaEvent::RejectSchema
    }

    fn process(&self, context: &mut SchemaContext) -> Result<()> {
        let SchemaRequest::Reject(key) = &context.request else {
            return Err(LeiaError::ProcessorNotFound(context.event()));
        };
        let mut details = load(self.repository.as_ref(), key)?;
        ensure_created(&details, self.name())?;

        details.schema_state = SchemaState::Rejected;
        add_history(&mut details, &context.updater, self.name());
        self.repository.update(&details)?;
        context.schema_details = Some(details);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use leia_models::CreateSchemaRequest;

    use super::*;
    use crate::repository::InMemorySchemaRepository;
    use crate::version::TimestampVersionGenerator;

    #[test]
    fn processor_rejects_foreign_request() {
        let repository = Arc::new(InMemorySchemaRepository::new());
        let processor =
            CreateSchemaProcessor::new(repository, Arc::new(TimestampVersionGenerator::new()));
        let mut context = SchemaContext::new(
            SchemaRequest::Approve(SchemaKey::new("ns", "order", "V1")),
            SchemaUpdater::new("u1", "u1@acme.io", "U One"),
        );

        let err = processor.process(&mut context).expect_err("should refuse");
        assert!(matches!(err, LeiaError::ProcessorNotFound(SchemaEvent::ApproveSchema)));
        assert!(context.schema_details.is_none());
    }

    #[test]
    fn create_appends_one_history_item() {
        let repository = Arc::new(InMemorySchemaRepository::new());
        let processor = CreateSchemaProcessor::new(
            repository.clone(),
            Arc::new(TimestampVersionGenerator::new()),
        );
        let mut context = SchemaContext::new(
            SchemaRequest::Create(CreateSchemaRequest::new(
                SchemaKey::new("ns", "order", "V1"),
                Vec::new(),
            )),
            SchemaUpdater::new("u1", "u1@acme.io", "U One"),
        );

        processor.process(&mut context).expect("create should succeed");

        let details = context.schema_details.expect("record should be returned");
        assert_eq!(details.history.len(), 1);
        let item = &details.history[0];
        assert_eq!(item.event, SchemaEvent::CreateSchema);
        assert_eq!(item.updater_id, "u1");
        assert_eq!(item.updater_name, "U One");
        assert!(item.timestamp > 0);
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn create_over_approved_version_is_already_exists() {
        let key = SchemaKey::new("ns", "order", "V1");
        let approved = SchemaDetails {
            schema_state: SchemaState::Approved,
            ..SchemaDetails::new(key.clone())
        };
        let repository = Arc::new(InMemorySchemaRepository::with_records([approved]));
        let processor =
            CreateSchemaProcessor::new(repository, Arc::new(TimestampVersionGenerator::new()));
        let mut context = SchemaContext::new(
            SchemaRequest::Create(CreateSchemaRequest::new(key, Vec::new())),
            SchemaUpdater::new("u1", "u1@acme.io", "U One"),
        );

        let err = processor.process(&mut context).expect_err("create should fail");
        assert!(matches!(err, LeiaError::SchemaAlreadyExists { .. }));
        assert_eq!(err.code().status(), 400);
    }
}
