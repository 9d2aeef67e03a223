//! Derived, read-only report aggregates.
//!
//! Reports are computed on demand from the current resident and request
//! collections; they are never stored. A document counts as *issued* once it
//! is `completed` or `ready_for_pickup` — approval alone does not issue
//! anything.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::document_request::{DocumentRequest, DocumentType, RequestStatus};
use crate::domain::resident::{Gender, Resident};

/// Demographic summary of the resident collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentReport {
    /// Total registered residents.
    pub total_residents: usize,
    /// Residents recorded as male.
    pub total_male: usize,
    /// Residents recorded as female.
    pub total_female: usize,
    /// Residents recorded as other.
    pub total_other: usize,
    /// When the report was computed.
    pub last_updated: DateTime<Utc>,
}

impl ResidentReport {
    /// Compute the report from the current resident records.
    pub fn from_residents(residents: &[Resident], now: DateTime<Utc>) -> Self {
        let count = |gender: Gender| residents.iter().filter(|r| r.gender == gender).count();
        Self {
            total_residents: residents.len(),
            total_male: count(Gender::Male),
            total_female: count(Gender::Female),
            total_other: count(Gender::Other),
            last_updated: now,
        }
    }
}

/// Issuance and workload summary of the document request collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// Requests whose document has been issued (completed or ready).
    pub total_documents_issued: usize,
    /// Issued barangay clearances.
    pub barangay_clearance: usize,
    /// Issued certificates of residency.
    pub certificate_of_residency: usize,
    /// Issued certificates of indigency.
    pub certificate_of_indigency: usize,
    /// Requests awaiting review.
    pub pending_requests: usize,
    /// Requests approved but not yet prepared.
    pub approved_requests: usize,
    /// Requests awaiting pickup.
    pub ready_for_pickup: usize,
    /// Requests picked up.
    pub completed_requests: usize,
    /// Requests returned for revision.
    pub needs_revision: usize,
    /// Requests declined.
    pub rejected_requests: usize,
    /// When the report was computed.
    pub last_updated: DateTime<Utc>,
}

fn is_issued(request: &DocumentRequest) -> bool {
    matches!(
        request.status,
        RequestStatus::Completed | RequestStatus::ReadyForPickup
    )
}

impl DocumentReport {
    /// Compute the report from the current request records.
    pub fn from_requests(requests: &[DocumentRequest], now: DateTime<Utc>) -> Self {
        let issued_of_type = |document_type: DocumentType| {
            requests
                .iter()
                .filter(|r| r.document_type == document_type && is_issued(r))
                .count()
        };
        let with_status = |status: RequestStatus| {
            requests.iter().filter(|r| r.status == status).count()
        };
        Self {
            total_documents_issued: requests.iter().filter(|r| is_issued(r)).count(),
            barangay_clearance: issued_of_type(DocumentType::BarangayClearance),
            certificate_of_residency: issued_of_type(DocumentType::CertificateOfResidency),
            certificate_of_indigency: issued_of_type(DocumentType::CertificateOfIndigency),
            pending_requests: with_status(RequestStatus::Pending),
            approved_requests: with_status(RequestStatus::Approved),
            ready_for_pickup: with_status(RequestStatus::ReadyForPickup),
            completed_requests: with_status(RequestStatus::Completed),
            needs_revision: with_status(RequestStatus::NeedsRevision),
            rejected_requests: with_status(RequestStatus::Rejected),
            last_updated: now,
        }
    }
}
