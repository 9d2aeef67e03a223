//! Barangay announcements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::document_request::RecordId;
use crate::domain::identity::IdentityId;

/// Category an announcement is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementCategory {
    Event,
    Alert,
    Update,
    Other,
}

/// Announcement published by staff.
///
/// Residents only see announcements with `is_active` set; staff manage the
/// full set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Store-assigned identifier.
    #[schema(value_type = String)]
    pub id: RecordId,
    /// Headline shown in lists.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Category used for filtering and icons.
    pub category: AnnouncementCategory,
    /// Staff identity that published the announcement.
    #[schema(value_type = String)]
    pub created_by: IdentityId,
    /// When the announcement was published.
    pub created_at: DateTime<Utc>,
    /// When the announcement was last edited.
    pub updated_at: DateTime<Utc>,
    /// Whether residents can see the announcement.
    pub is_active: bool,
    /// Attached image, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

/// Fields supplied when publishing a new announcement; the store assigns the
/// id and the service stamps the timestamps.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    /// Headline shown in lists.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Category used for filtering and icons.
    pub category: AnnouncementCategory,
    /// Staff identity publishing the announcement.
    pub created_by: IdentityId,
    /// Whether residents can see the announcement immediately.
    pub is_active: bool,
    /// Attached image, when provided.
    pub attachment_url: Option<String>,
}
