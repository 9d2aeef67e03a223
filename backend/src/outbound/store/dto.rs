//! Wire representations of stored documents.
//!
//! The hosted store is schemaless, so documents written by earlier clients
//! carry timestamps in several shapes: the provider-native
//! `{seconds, nanos}` object, an epoch-milliseconds number, or an RFC 3339
//! string. Every shape normalises to the same UTC instant here; nothing past
//! this module sees anything but `DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::announcement::{Announcement, AnnouncementCategory};
use crate::domain::document_request::{DocumentRequest, DocumentType, RecordId, RequestStatus};
use crate::domain::identity::{EmailAddress, IdentityId};
use crate::domain::resident::{CivilStatus, Gender, Resident};
use crate::domain::role::{StaffGrade, StaffRecord};

/// A timestamp as it may appear in a stored document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    /// Provider-native form.
    Native {
        /// Whole seconds since the Unix epoch.
        seconds: i64,
        /// Sub-second nanoseconds.
        #[serde(default)]
        nanos: u32,
    },
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// RFC 3339 string.
    Text(String),
}

impl StoredTimestamp {
    /// Normalise to a UTC instant.
    pub fn normalize(&self) -> Result<DateTime<Utc>, String> {
        match self {
            Self::Native { seconds, nanos } => DateTime::from_timestamp(*seconds, *nanos)
                .ok_or_else(|| format!("timestamp out of range: seconds={seconds} nanos={nanos}")),
            Self::Millis(millis) => DateTime::from_timestamp_millis(*millis)
                .ok_or_else(|| format!("timestamp out of range: millis={millis}")),
            Self::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|err| format!("invalid timestamp string {text:?}: {err}")),
        }
    }
}

fn normalize_optional(
    field: &str,
    value: Option<&StoredTimestamp>,
) -> Result<Option<DateTime<Utc>>, String> {
    value
        .map(|ts| ts.normalize().map_err(|err| format!("{field}: {err}")))
        .transpose()
}

/// Stored resident profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentDoc {
    pub id: IdentityId,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub barangay: String,
    #[serde(default)]
    pub phone: String,
    pub email: EmailAddress,
    pub civil_status: CivilStatus,
    #[serde(default)]
    pub occupation: Option<String>,
    pub created_at: StoredTimestamp,
    pub updated_at: StoredTimestamp,
    /// Absent on profiles written before provenance was recorded; those were
    /// self-registered, so the profile id stands in.
    #[serde(default)]
    pub created_by: Option<IdentityId>,
}

impl ResidentDoc {
    /// Decode into the domain record.
    pub fn into_domain(self) -> Result<Resident, String> {
        let created_by = self.created_by.unwrap_or_else(|| self.id.clone());
        Ok(Resident {
            created_at: self.created_at.normalize().map_err(|e| format!("createdAt: {e}"))?,
            updated_at: self.updated_at.normalize().map_err(|e| format!("updatedAt: {e}"))?,
            id: self.id,
            name: self.name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
            barangay: self.barangay,
            phone: self.phone,
            email: self.email,
            civil_status: self.civil_status,
            occupation: self.occupation,
            created_by,
        })
    }
}

/// Stored document request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequestDoc {
    pub id: String,
    pub resident_id: IdentityId,
    pub resident_name: String,
    pub document_type: DocumentType,
    pub purpose: String,
    pub status: RequestStatus,
    pub request_date: StoredTimestamp,
    #[serde(default)]
    pub approved_date: Option<StoredTimestamp>,
    #[serde(default)]
    pub ready_date: Option<StoredTimestamp>,
    #[serde(default)]
    pub completed_date: Option<StoredTimestamp>,
    #[serde(default)]
    pub approved_by: Option<IdentityId>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub revision_reason: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

impl DocumentRequestDoc {
    /// Decode into the domain record.
    pub fn into_domain(self) -> Result<DocumentRequest, String> {
        Ok(DocumentRequest {
            request_date: self
                .request_date
                .normalize()
                .map_err(|e| format!("requestDate: {e}"))?,
            approved_date: normalize_optional("approvedDate", self.approved_date.as_ref())?,
            ready_date: normalize_optional("readyDate", self.ready_date.as_ref())?,
            completed_date: normalize_optional("completedDate", self.completed_date.as_ref())?,
            id: RecordId::new(self.id),
            resident_id: self.resident_id,
            resident_name: self.resident_name,
            document_type: self.document_type,
            purpose: self.purpose,
            status: self.status,
            approved_by: self.approved_by,
            rejection_reason: self.rejection_reason,
            remarks: self.remarks,
            revision_reason: self.revision_reason,
            attachment_url: self.attachment_url,
        })
    }
}

/// Stored announcement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDoc {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    pub created_by: IdentityId,
    pub created_at: StoredTimestamp,
    pub updated_at: StoredTimestamp,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl AnnouncementDoc {
    /// Decode into the domain record.
    pub fn into_domain(self) -> Result<Announcement, String> {
        Ok(Announcement {
            created_at: self.created_at.normalize().map_err(|e| format!("createdAt: {e}"))?,
            updated_at: self.updated_at.normalize().map_err(|e| format!("updatedAt: {e}"))?,
            id: RecordId::new(self.id),
            title: self.title,
            content: self.content,
            category: self.category,
            created_by: self.created_by,
            is_active: self.is_active,
            attachment_url: self.attachment_url,
        })
    }
}

/// Stored staff directory entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDoc {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub name: String,
    pub grade: StaffGrade,
    pub created_at: StoredTimestamp,
    #[serde(default)]
    pub created_by: Option<IdentityId>,
}

impl StaffDoc {
    /// Decode into the domain record.
    pub fn into_domain(self) -> Result<StaffRecord, String> {
        Ok(StaffRecord {
            created_at: self.created_at.normalize().map_err(|e| format!("createdAt: {e}"))?,
            uid: self.id,
            email: self.email,
            name: self.name,
            grade: self.grade,
            created_by: self.created_by,
        })
    }
}
