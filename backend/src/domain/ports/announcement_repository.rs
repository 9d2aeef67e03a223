//! Port for the `announcements` collection.

use async_trait::async_trait;

use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::document_request::RecordId;
use crate::domain::ports::store::StoreError;

/// Access to announcements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Persist a new announcement, returning it with its assigned id and
    /// creation timestamps stamped.
    async fn create(&self, draft: &NewAnnouncement) -> Result<Announcement, StoreError>;

    /// Fetch one announcement.
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Announcement>, StoreError>;

    /// Fetch every announcement, newest first.
    async fn list_all(&self) -> Result<Vec<Announcement>, StoreError>;

    /// Fetch the announcements residents may see, newest first.
    async fn list_active(&self) -> Result<Vec<Announcement>, StoreError>;

    /// Overwrite a stored announcement.
    async fn update(&self, announcement: &Announcement) -> Result<(), StoreError>;

    /// Remove one announcement. Succeeds when the announcement does not
    /// exist, so a commit racing a manual delete stays idempotent.
    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;
}
