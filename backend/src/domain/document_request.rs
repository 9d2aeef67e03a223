//! Document requests and their status state machine.
//!
//! Status flow: `pending → approved → ready_for_pickup → completed`, with
//! side branches `pending|approved → rejected` and
//! `pending|approved → needs_revision`. Transitions are staff-initiated and
//! one-way; nothing returns a request to `pending`. Each transition stamps
//! exactly one date or reason field and leaves the rest untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::identity::IdentityId;

/// Identifier assigned by the document store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Document types the barangay issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BarangayClearance,
    CertificateOfResidency,
    CertificateOfIndigency,
}

/// Request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted by a resident, awaiting staff review.
    Pending,
    /// Approved by staff, document being prepared.
    Approved,
    /// Document prepared and awaiting pickup.
    ReadyForPickup,
    /// Picked up; terminal.
    Completed,
    /// Declined with a reason; terminal.
    Rejected,
    /// Returned to the resident with a reason; terminal for staff flow.
    NeedsRevision,
}

/// Rejected state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The request is not in a state the transition accepts.
    #[error("cannot move a {from:?} request to {to:?}")]
    InvalidTransition {
        /// Status the request currently holds.
        from: RequestStatus,
        /// Status the caller tried to move it to.
        to: RequestStatus,
    },
    /// Reject and revision transitions require a non-empty reason.
    #[error("a reason is required to mark a request {to:?}")]
    MissingReason {
        /// Status the caller tried to move the request to.
        to: RequestStatus,
    },
}

impl From<TransitionError> for crate::domain::Error {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::InvalidTransition { .. } => Self::conflict(value.to_string()),
            TransitionError::MissingReason { .. } => Self::invalid_request(value.to_string()),
        }
    }
}

/// A resident's request for a barangay document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Store-assigned identifier.
    #[schema(value_type = String)]
    pub id: RecordId,
    /// Identity uid of the requesting resident.
    #[schema(value_type = String)]
    pub resident_id: IdentityId,
    /// Resident name denormalised at submission time.
    pub resident_name: String,
    /// Document being requested.
    pub document_type: DocumentType,
    /// Stated purpose (e.g. employment).
    pub purpose: String,
    /// Lifecycle state; see the module docs for the allowed flow.
    pub status: RequestStatus,
    /// When the resident submitted the request.
    pub request_date: DateTime<Utc>,
    /// Stamped by the approve transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    /// Stamped by the ready-for-pickup transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_date: Option<DateTime<Utc>>,
    /// Stamped by the complete transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    /// Staff identity recorded by the approve transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub approved_by: Option<IdentityId>,
    /// Reason recorded by the reject transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Free-form staff remarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Reason recorded by the needs-revision transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_reason: Option<String>,
    /// Uploaded ID or supporting image, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl DocumentRequest {
    /// Approve a pending request, stamping the approval date and approver.
    pub fn approve(
        &mut self,
        approved_by: IdentityId,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.ensure_from(&[RequestStatus::Pending], RequestStatus::Approved)?;
        self.status = RequestStatus::Approved;
        self.approved_date = Some(now);
        self.approved_by = Some(approved_by);
        Ok(())
    }

    /// Mark an approved request as ready for pickup.
    pub fn mark_ready(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.ensure_from(&[RequestStatus::Approved], RequestStatus::ReadyForPickup)?;
        self.status = RequestStatus::ReadyForPickup;
        self.ready_date = Some(now);
        Ok(())
    }

    /// Mark a ready request as picked up.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> Result<(), TransitionError> {
        self.ensure_from(&[RequestStatus::ReadyForPickup], RequestStatus::Completed)?;
        self.status = RequestStatus::Completed;
        self.completed_date = Some(now);
        Ok(())
    }

    /// Reject a pending or approved request with a reason.
    pub fn reject(&mut self, reason: &str) -> Result<(), TransitionError> {
        let reason = Self::require_reason(reason, RequestStatus::Rejected)?;
        self.ensure_from(
            &[RequestStatus::Pending, RequestStatus::Approved],
            RequestStatus::Rejected,
        )?;
        self.status = RequestStatus::Rejected;
        self.rejection_reason = Some(reason);
        Ok(())
    }

    /// Return a pending or approved request to the resident for revision.
    pub fn request_revision(&mut self, reason: &str) -> Result<(), TransitionError> {
        let reason = Self::require_reason(reason, RequestStatus::NeedsRevision)?;
        self.ensure_from(
            &[RequestStatus::Pending, RequestStatus::Approved],
            RequestStatus::NeedsRevision,
        )?;
        self.status = RequestStatus::NeedsRevision;
        self.revision_reason = Some(reason);
        Ok(())
    }

    fn ensure_from(
        &self,
        allowed: &[RequestStatus],
        to: RequestStatus,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }

    fn require_reason(reason: &str, to: RequestStatus) -> Result<String, TransitionError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(TransitionError::MissingReason { to });
        }
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the status state machine.
    use super::*;
    use rstest::rstest;

    fn pending_request() -> DocumentRequest {
        DocumentRequest {
            id: RecordId::new("req-1"),
            resident_id: IdentityId::new("res-1").expect("fixture uid"),
            resident_name: "Ana Reyes".to_owned(),
            document_type: DocumentType::BarangayClearance,
            purpose: "employment".to_owned(),
            status: RequestStatus::Pending,
            request_date: Utc::now(),
            approved_date: None,
            ready_date: None,
            completed_date: None,
            approved_by: None,
            rejection_reason: None,
            remarks: None,
            revision_reason: None,
            attachment_url: None,
        }
    }

    fn staff() -> IdentityId {
        IdentityId::new("staff-1").expect("fixture uid")
    }

    #[test]
    fn happy_path_stamps_one_field_per_transition() {
        let mut request = pending_request();
        let now = Utc::now();

        request.approve(staff(), now).expect("approve from pending");
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.approved_date, Some(now));
        assert_eq!(request.approved_by, Some(staff()));
        assert!(request.ready_date.is_none());

        request.mark_ready(now).expect("ready from approved");
        assert_eq!(request.status, RequestStatus::ReadyForPickup);
        assert_eq!(request.ready_date, Some(now));
        assert!(request.completed_date.is_none());

        request.mark_completed(now).expect("complete from ready");
        assert_eq!(request.status, RequestStatus::Completed);
        assert_eq!(request.completed_date, Some(now));
        assert!(request.rejection_reason.is_none());
        assert!(request.revision_reason.is_none());
    }

    #[rstest]
    #[case(RequestStatus::Pending)]
    #[case(RequestStatus::Approved)]
    fn reject_and_revision_accept_pending_and_approved(#[case] from: RequestStatus) {
        let mut request = pending_request();
        request.status = from;
        request.reject("incomplete attachment").expect("reject");
        assert_eq!(request.status, RequestStatus::Rejected);
        assert_eq!(
            request.rejection_reason.as_deref(),
            Some("incomplete attachment")
        );

        let mut request = pending_request();
        request.status = from;
        request.request_revision("blurred ID photo").expect("revise");
        assert_eq!(request.status, RequestStatus::NeedsRevision);
        assert_eq!(request.revision_reason.as_deref(), Some("blurred ID photo"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_reasons_fail_before_any_mutation(#[case] reason: &str) {
        let mut request = pending_request();
        let err = request.reject(reason).expect_err("blank reason");
        assert_eq!(
            err,
            TransitionError::MissingReason {
                to: RequestStatus::Rejected
            }
        );
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.rejection_reason.is_none());
    }

    #[rstest]
    #[case(RequestStatus::Completed)]
    #[case(RequestStatus::Rejected)]
    #[case(RequestStatus::NeedsRevision)]
    fn terminal_states_accept_no_transition(#[case] terminal: RequestStatus) {
        let mut request = pending_request();
        request.status = terminal;
        let now = Utc::now();

        assert!(request.approve(staff(), now).is_err());
        assert!(request.mark_ready(now).is_err());
        assert!(request.mark_completed(now).is_err());
        assert!(request.reject("reason").is_err());
        assert!(request.request_revision("reason").is_err());
        assert_eq!(request.status, terminal);
    }

    #[test]
    fn approve_only_accepts_pending() {
        let mut request = pending_request();
        request.status = RequestStatus::Approved;
        let err = request
            .approve(staff(), Utc::now())
            .expect_err("double approve");
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: RequestStatus::Approved,
                to: RequestStatus::Approved
            }
        );
    }

    #[test]
    fn statuses_serialise_as_snake_case() {
        assert_eq!(
            serde_json::to_value(RequestStatus::ReadyForPickup).expect("serialisable"),
            serde_json::json!("ready_for_pickup")
        );
        assert_eq!(
            serde_json::to_value(DocumentType::CertificateOfIndigency).expect("serialisable"),
            serde_json::json!("certificate_of_indigency")
        );
    }
}
