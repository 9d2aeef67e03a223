//! Application service for document requests.
//!
//! Submissions come from residents; every transition is staff-initiated and
//! follows a load, mutate, store cycle against the request repository.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::document_request::{
    DocumentRequest, DocumentType, RecordId, RequestStatus,
};
use crate::domain::error::Error;
use crate::domain::identity::IdentityId;
use crate::domain::ports::{DocumentRequestRepository, NewDocumentRequest};
use crate::domain::resident::Resident;

/// Fields a resident supplies when submitting a request.
#[derive(Debug, Clone)]
pub struct RequestSubmission {
    /// Document being requested.
    pub document_type: DocumentType,
    /// Stated purpose.
    pub purpose: String,
    /// Uploaded supporting image, when provided.
    pub attachment_url: Option<String>,
}

/// Handles submission and the staff review lifecycle.
pub struct DocumentRequestService {
    repo: Arc<dyn DocumentRequestRepository>,
    clock: Arc<dyn Clock>,
}

impl DocumentRequestService {
    /// Build a service over the given repository.
    pub fn new(repo: Arc<dyn DocumentRequestRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Submit a new request on behalf of a resident. The stored request
    /// starts `pending` with the submission time stamped.
    pub async fn submit(
        &self,
        resident: &Resident,
        submission: RequestSubmission,
    ) -> Result<DocumentRequest, Error> {
        let purpose = submission.purpose.trim();
        if purpose.is_empty() {
            return Err(Error::invalid_request("a purpose is required"));
        }
        let draft = NewDocumentRequest {
            resident_id: resident.id.clone(),
            resident_name: resident.name.clone(),
            document_type: submission.document_type,
            purpose: purpose.to_owned(),
            status: RequestStatus::Pending,
            request_date: self.clock.utc(),
            attachment_url: submission.attachment_url,
        };
        let request = self.repo.create(&draft).await?;
        Ok(request)
    }

    /// Fetch one request.
    pub async fn get(&self, id: &RecordId) -> Result<DocumentRequest, Error> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("document request not found"))
    }

    /// Every request, newest submissions first.
    pub async fn list_all(&self) -> Result<Vec<DocumentRequest>, Error> {
        Ok(self.repo.list_all().await?)
    }

    /// The requests one resident has submitted, newest first.
    pub async fn list_by_resident(
        &self,
        resident_id: &IdentityId,
    ) -> Result<Vec<DocumentRequest>, Error> {
        Ok(self.repo.list_by_resident(resident_id).await?)
    }

    /// The requests currently in one status, newest first.
    pub async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DocumentRequest>, Error> {
        Ok(self.repo.list_by_status(status).await?)
    }

    /// Approve a pending request.
    pub async fn approve(
        &self,
        id: &RecordId,
        approved_by: IdentityId,
    ) -> Result<DocumentRequest, Error> {
        self.transition(id, |request, now| request.approve(approved_by, now))
            .await
    }

    /// Mark an approved request's document as ready for pickup.
    pub async fn mark_ready(&self, id: &RecordId) -> Result<DocumentRequest, Error> {
        self.transition(id, DocumentRequest::mark_ready).await
    }

    /// Mark a ready request as picked up.
    pub async fn mark_completed(&self, id: &RecordId) -> Result<DocumentRequest, Error> {
        self.transition(id, DocumentRequest::mark_completed).await
    }

    /// Reject a request with a reason.
    pub async fn reject(&self, id: &RecordId, reason: &str) -> Result<DocumentRequest, Error> {
        self.transition(id, |request, _| request.reject(reason)).await
    }

    /// Return a request to the resident for revision.
    pub async fn request_revision(
        &self,
        id: &RecordId,
        reason: &str,
    ) -> Result<DocumentRequest, Error> {
        self.transition(id, |request, _| request.request_revision(reason))
            .await
    }

    /// Remove a request outright.
    pub async fn delete(&self, id: &RecordId) -> Result<(), Error> {
        Ok(self.repo.delete(id).await?)
    }

    async fn transition<F>(&self, id: &RecordId, apply: F) -> Result<DocumentRequest, Error>
    where
        F: FnOnce(
            &mut DocumentRequest,
            chrono::DateTime<chrono::Utc>,
        ) -> Result<(), crate::domain::document_request::TransitionError>,
    {
        let mut request = self.get(id).await?;
        apply(&mut request, self.clock.utc())?;
        self.repo.update(&request).await?;
        Ok(request)
    }
}
