use std::sync::Arc;

use leia_models::{
    CreateSchemaRequest, SchemaDetails, SchemaKey, SchemaUpdater, UpdateSchemaRequest,
};
use tracing::info;

use crate::context::{SchemaContext, SchemaRequest};
use crate::error::{LeiaError, Result};
use crate::hub::SchemaProcessorHub;

/// Entry point of the schema lifecycle.
///
/// Builds a context per call, dispatches it to the processor owning the event
/// and returns the record the processor produced.
pub struct SchemaIngestor {
    hub: Arc<dyn SchemaProcessorHub>,
}

impl SchemaIngestor {
    pub fn new(hub: Arc<dyn SchemaProcessorHub>) -> Self {
        info!("schema ingestor ready");
        Self { hub }
    }

    pub fn add(
        &self,
        updater: SchemaUpdater,
        request: CreateSchemaRequest,
    ) -> Result<Option<SchemaDetails>> {
        self.ingest(updater, SchemaRequest::Create(request))
    }

    pub fn update(
        &self,
        updater: SchemaUpdater,
        request: UpdateSchemaRequest,
    ) -> Result<Option<SchemaDetails>> {
        self.ingest(updater, SchemaRequest::Update(request))
    }

    pub fn approve(
        &self,
        updater: SchemaUpdater,
        schema_key: SchemaKey,
    ) -> Result<Option<SchemaDetails>> {
        self.ingest(updater, SchemaRequest::Approve(schema_key))
    }

    pub fn reject(
        &self,
        updater: SchemaUpdater,
        schema_key: SchemaKey,
    ) -> Result<Option<SchemaDetails>> {
        self.ingest(updater, SchemaRequest::Reject(schema_key))
    }

    pub fn ingest(
        &self,
        updater: SchemaUpdater,
        request: SchemaRequest,
    ) -> Result<Option<SchemaDetails>> {
        let event = request.event();
        let processor = self
            .hub
            .processor(event)
            .ok_or(LeiaError::ProcessorNotFound(event))?;
        let mut context = SchemaContext::new(request, updater);
        processor.process(&mut context)?;
        Ok(context.schema_details)
    }
}

#[cfg(test)]
mod tests {
    use leia_models::{SchemaAttribute, SchemaEvent, SchemaState};

    use super::*;
    use crate::error::LeiaErrorCode;
    use crate::hub::DefaultProcessorHub;
    use crate::repository::{InMemorySchemaRepository, SchemaRepository};
    use crate::version::TimestampVersionGenerator;

    fn alice() -> SchemaUpdater {
        SchemaUpdater::new("alice", "alice@acme.io", "Alice")
    }

    fn bob() -> SchemaUpdater {
        SchemaUpdater::new("bob", "bob@acme.io", "Bob")
    }

    fn setup() -> (Arc<InMemorySchemaRepository>, SchemaIngestor) {
        let repository = Arc::new(InMemorySchemaRepository::new());
        let hub = DefaultProcessorHub::new(
            repository.clone(),
            Arc::new(TimestampVersionGenerator::new()),
        );
        (repository, SchemaIngestor::new(Arc::new(hub)))
    }

    fn create_request(version: &str) -> CreateSchemaRequest {
        CreateSchemaRequest::new(
            SchemaKey::new("payments", "refund", version),
            vec![SchemaAttribute::string("id")],
        )
    }

    fn created(ingestor: &SchemaIngestor, version: &str) -> SchemaDetails {
        ingestor
            .add(alice(), create_request(version))
            .expect("create should succeed")
            .expect("record should be returned")
    }

    #[test]
    fn missing_processor_is_fatal() {
        let ingestor = SchemaIngestor::new(Arc::new(DefaultProcessorHub::empty()));
        let err = ingestor
            .add(alice(), create_request("V1"))
            .expect_err("should fail");
        assert_eq!(err.code(), LeiaErrorCode::ProcessorNotFound);
    }

    #[test]
    fn create_starts_in_created_state() {
        let (repository, ingestor) = setup();
        let details = created(&ingestor, "V1");

        assert_eq!(details.schema_state, SchemaState::Created);
        assert_eq!(details.history.len(), 1);
        assert_eq!(details.history[0].event, SchemaEvent::CreateSchema);
        assert_eq!(details.history[0].updater_email, "alice@acme.io");
        assert!(repository
            .get(&details.schema_key)
            .expect("get should succeed")
            .is_some());
    }

    #[test]
    fn create_generates_missing_version() {
        let (_, ingestor) = setup();
        let details = created(&ingestor, "");
        assert!(details.schema_key.version.starts_with('V'));
        assert!(details.schema_key.version.len() > 1);
    }

    #[test]
    fn second_created_version_is_refused() {
        let (_, ingestor) = setup();
        created(&ingestor, "V1");

        let err = ingestor
            .add(bob(), create_request("V2"))
            .expect_err("should fail");
        assert_eq!(err.code(), LeiaErrorCode::SchemaAlreadyExists);
    }

    #[test]
    fn update_mutates_created_record_in_place() {
        let (repository, ingestor) = setup();
        let details = created(&ingestor, "V1");

        let mut request = UpdateSchemaRequest::new(
            details.schema_key.clone(),
            vec![SchemaAttribute::string("id"), SchemaAttribute::long("amount")],
        );
        request.description = "refunds".into();
        let updated = ingestor
            .update(bob(), request)
            .expect("update should succeed")
            .expect("record should be returned");

        assert_eq!(updated.schema_key, details.schema_key);
        assert_eq!(updated.attributes.len(), 2);
        assert_eq!(updated.history.len(), 2);
        assert_eq!(updated.history[1].event, SchemaEvent::UpdateSchema);
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn update_of_unknown_schema_fails() {
        let (_, ingestor) = setup();
        let err = ingestor
            .update(
                alice(),
                UpdateSchemaRequest::new(SchemaKey::new("payments", "refund", "V9"), Vec::new()),
            )
            .expect_err("should fail");
        assert_eq!(err.code(), LeiaErrorCode::NoSchemaFound);
    }

    #[test]
    fn update_of_approved_record_forks_a_new_version() {
        let (repository, ingestor) = setup();
        let details = created(&ingestor, "V1");
        ingestor
            .approve(bob(), details.schema_key.clone())
            .expect("approve should succeed");

        let forked = ingestor
            .update(
                alice(),
                UpdateSchemaRequest::new(details.schema_key.clone(), Vec::new()),
            )
            .expect("update should succeed")
            .expect("record should be returned");

        assert_ne!(forked.schema_key.version, "V1");
        assert_eq!(forked.schema_state, SchemaState::Created);
        assert_eq!(forked.last_history().map(|h| h.event), Some(SchemaEvent::UpdateSchema));

        let original = repository
            .get(&details.schema_key)
            .expect("get should succeed")
            .expect("original should remain");
        assert_eq!(original.schema_state, SchemaState::Approved);
        assert_eq!(repository.len(), 2);
    }

    #[test]
    fn approve_and_reject_only_from_created() {
        let (_, ingestor) = setup();
        let details = created(&ingestor, "V1");

        let approved = ingestor
            .approve(bob(), details.schema_key.clone())
            .expect("approve should succeed")
            .expect("record should be returned");
        assert_eq!(approved.schema_state, SchemaState::Approved);
        assert_eq!(approved.history.len(), 2);

        let err = ingestor
            .reject(bob(), details.schema_key.clone())
            .expect_err("reject after approve should fail");
        assert_eq!(err.code(), LeiaErrorCode::InvalidStateTransition);

        let err = ingestor
            .approve(alice(), details.schema_key)
            .expect_err("second approve should fail");
        assert_eq!(err.code(), LeiaErrorCode::InvalidStateTransition);
    }

    #[test]
    fn last_updater_cannot_approve() {
        let (_, ingestor) = setup();
        let details = created(&ingestor, "V1");

        let err = ingestor
            .approve(alice(), details.schema_key)
            .expect_err("self approval should fail");
        assert_eq!(err.code(), LeiaErrorCode::SchemaApprovalUnauthorized);
    }

    #[test]
    fn rejected_record_is_final() {
        let (_, ingestor) = setup();
        let details = created(&ingestor, "V1");
        let rejected = ingestor
            .reject(alice(), details.schema_key.clone())
            .expect("reject should succeed")
            .expect("record should be returned");
        assert_eq!(rejected.schema_state, SchemaState::Rejected);

        let err = ingestor
            .update(alice(), UpdateSchemaRequest::new(details.schema_key, Vec::new()))
            .expect_err("update should fail");
        assert_eq!(err.code(), LeiaErrorCode::InvalidStateTransition);
    }

    #[test]
    fn rejected_record_frees_the_created_slot() {
        let (_, ingestor) = setup();
        let details = created(&ingestor, "V1");
        ingestor
            .reject(bob(), details.schema_key)
            .expect("reject should succeed");

        assert!(ingestor.add(alice(), create_request("V2")).is_ok());
    }
}
