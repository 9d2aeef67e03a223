//! Port for the `users` collection holding staff records.

use async_trait::async_trait;

use crate::domain::identity::IdentityId;
use crate::domain::ports::store::StoreError;
use crate::domain::role::StaffRecord;

/// Access to staff records, keyed by identity uid.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Fetch one staff record by identity uid.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<StaffRecord>, StoreError>;

    /// Create or overwrite the record stored under `record.uid`.
    async fn upsert(&self, record: &StaffRecord) -> Result<(), StoreError>;

    /// Remove one staff record. Succeeds when the record does not exist.
    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError>;
}
