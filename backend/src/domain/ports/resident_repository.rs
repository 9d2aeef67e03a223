//! Port for the `residents` collection.

use async_trait::async_trait;

use crate::domain::identity::IdentityId;
use crate::domain::ports::store::StoreError;
use crate::domain::resident::Resident;

/// Access to resident profiles, keyed by identity uid.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Create or overwrite the profile stored under `resident.id`.
    async fn upsert(&self, resident: &Resident) -> Result<(), StoreError>;

    /// Fetch one profile by identity uid.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Resident>, StoreError>;

    /// Fetch every profile.
    async fn list_all(&self) -> Result<Vec<Resident>, StoreError>;

    /// Remove one profile. Succeeds when the profile does not exist.
    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError>;
}
