//! Port for the `document_requests` collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::document_request::{
    DocumentRequest, DocumentType, RecordId, RequestStatus,
};
use crate::domain::identity::IdentityId;
use crate::domain::ports::store::StoreError;

/// A fully validated submission awaiting an id. The service stamps status and
/// submission date; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewDocumentRequest {
    /// Identity uid of the requesting resident.
    pub resident_id: IdentityId,
    /// Resident name denormalised at submission time.
    pub resident_name: String,
    /// Document being requested.
    pub document_type: DocumentType,
    /// Stated purpose.
    pub purpose: String,
    /// Initial lifecycle state.
    pub status: RequestStatus,
    /// When the resident submitted the request.
    pub request_date: DateTime<Utc>,
    /// Uploaded supporting image, when provided.
    pub attachment_url: Option<String>,
}

/// Access to document requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRequestRepository: Send + Sync {
    /// Persist a submission, returning the stored record with its assigned
    /// id.
    async fn create(&self, draft: &NewDocumentRequest) -> Result<DocumentRequest, StoreError>;

    /// Fetch one request.
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<DocumentRequest>, StoreError>;

    /// Fetch every request, newest submissions first.
    async fn list_all(&self) -> Result<Vec<DocumentRequest>, StoreError>;

    /// Fetch the requests submitted by one resident, newest first.
    async fn list_by_resident(
        &self,
        resident_id: &IdentityId,
    ) -> Result<Vec<DocumentRequest>, StoreError>;

    /// Fetch the requests currently in one status, newest first.
    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DocumentRequest>, StoreError>;

    /// Overwrite a stored request.
    async fn update(&self, request: &DocumentRequest) -> Result<(), StoreError>;

    /// Remove one request. Succeeds when the request does not exist.
    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;
}
