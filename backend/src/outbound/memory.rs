//! In-memory adapters for tests and development mode.
//!
//! `MemoryStore` keeps every collection in process memory with the same
//! ordering guarantees as the HTTP adapter. `MemoryAuthProvider` mimics the
//! hosted identity provider closely enough for the portal flows: accounts
//! keyed by email, a single signed-in session, and a watch channel that
//! starts in the resolving state until a persisted session check is reported.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::watch;

use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::document_request::{DocumentRequest, RecordId, RequestStatus};
use crate::domain::identity::{Credentials, EmailAddress, Identity, IdentityId};
use crate::domain::ports::store::StoreError;
use crate::domain::ports::{
    AnnouncementRepository, AuthError, AuthProvider, AuthState, DocumentRequestRepository,
    NewDocumentRequest, ResidentRepository, StaffDirectory,
};
use crate::domain::resident::Resident;
use crate::domain::role::StaffRecord;

const MIN_PASSWORD_LENGTH: usize = 6;

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Process-local document store.
pub struct MemoryStore {
    residents: RwLock<HashMap<IdentityId, Resident>>,
    requests: RwLock<HashMap<RecordId, DocumentRequest>>,
    announcements: RwLock<HashMap<RecordId, Announcement>>,
    staff: RwLock<HashMap<IdentityId, StaffRecord>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Build an empty store.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            residents: RwLock::new(HashMap::new()),
            requests: RwLock::new(HashMap::new()),
            announcements: RwLock::new(HashMap::new()),
            staff: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            clock,
        }
    }

    fn mint_id(&self) -> RecordId {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst);
        // Zero-padded so lexicographic id order matches mint order.
        RecordId::new(format!("rec-{seq:06}"))
    }
}

fn requests_newest_first(mut requests: Vec<DocumentRequest>) -> Vec<DocumentRequest> {
    requests.sort_by(|a, b| {
        b.request_date
            .cmp(&a.request_date)
            .then_with(|| b.id.as_ref().cmp(a.id.as_ref()))
    });
    requests
}

#[async_trait]
impl ResidentRepository for MemoryStore {
    async fn upsert(&self, resident: &Resident) -> Result<(), StoreError> {
        write(&self.residents).insert(resident.id.clone(), resident.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Resident>, StoreError> {
        Ok(read(&self.residents).get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Resident>, StoreError> {
        let mut residents: Vec<Resident> = read(&self.residents).values().cloned().collect();
        residents.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(residents)
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError> {
        write(&self.residents).remove(id);
        Ok(())
    }
}

#[async_trait]
impl DocumentRequestRepository for MemoryStore {
    async fn create(&self, draft: &NewDocumentRequest) -> Result<DocumentRequest, StoreError> {
        let request = DocumentRequest {
            id: self.mint_id(),
            resident_id: draft.resident_id.clone(),
            resident_name: draft.resident_name.clone(),
            document_type: draft.document_type,
            purpose: draft.purpose.clone(),
            status: draft.status,
            request_date: draft.request_date,
            approved_date: None,
            ready_date: None,
            completed_date: None,
            approved_by: None,
            rejection_reason: None,
            remarks: None,
            revision_reason: None,
            attachment_url: draft.attachment_url.clone(),
        };
        write(&self.requests).insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<DocumentRequest>, StoreError> {
        Ok(read(&self.requests).get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<DocumentRequest>, StoreError> {
        Ok(requests_newest_first(
            read(&self.requests).values().cloned().collect(),
        ))
    }

    async fn list_by_resident(
        &self,
        resident_id: &IdentityId,
    ) -> Result<Vec<DocumentRequest>, StoreError> {
        Ok(requests_newest_first(
            read(&self.requests)
                .values()
                .filter(|r| &r.resident_id == resident_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<DocumentRequest>, StoreError> {
        Ok(requests_newest_first(
            read(&self.requests)
                .values()
                .filter(|r| r.status == status)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, request: &DocumentRequest) -> Result<(), StoreError> {
        let mut requests = write(&self.requests);
        if !requests.contains_key(&request.id) {
            return Err(StoreError::query(format!(
                "no document request {} to update",
                request.id
            )));
        }
        requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        write(&self.requests).remove(id);
        Ok(())
    }
}

#[async_trait]
impl AnnouncementRepository for MemoryStore {
    async fn create(&self, draft: &NewAnnouncement) -> Result<Announcement, StoreError> {
        let now = self.clock.utc();
        let announcement = Announcement {
            id: self.mint_id(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            category: draft.category,
            created_by: draft.created_by.clone(),
            created_at: now,
            updated_at: now,
            is_active: draft.is_active,
            attachment_url: draft.attachment_url.clone(),
        };
        write(&self.announcements).insert(announcement.id.clone(), announcement.clone());
        Ok(announcement)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Announcement>, StoreError> {
        Ok(read(&self.announcements).get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Announcement>, StoreError> {
        let mut announcements: Vec<Announcement> =
            read(&self.announcements).values().cloned().collect();
        announcements.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_ref().cmp(a.id.as_ref()))
        });
        Ok(announcements)
    }

    async fn list_active(&self) -> Result<Vec<Announcement>, StoreError> {
        let mut announcements = AnnouncementRepository::list_all(self).await?;
        announcements.retain(|a| a.is_active);
        Ok(announcements)
    }

    async fn update(&self, announcement: &Announcement) -> Result<(), StoreError> {
        let mut announcements = write(&self.announcements);
        if !announcements.contains_key(&announcement.id) {
            return Err(StoreError::query(format!(
                "no announcement {} to update",
                announcement.id
            )));
        }
        announcements.insert(announcement.id.clone(), announcement.clone());
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        write(&self.announcements).remove(id);
        Ok(())
    }
}

#[async_trait]
impl StaffDirectory for MemoryStore {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<StaffRecord>, StoreError> {
        Ok(read(&self.staff).get(id).cloned())
    }

    async fn upsert(&self, record: &StaffRecord) -> Result<(), StoreError> {
        write(&self.staff).insert(record.uid.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), StoreError> {
        write(&self.staff).remove(id);
        Ok(())
    }
}

struct Account {
    identity: Identity,
    password: String,
}

/// Process-local identity provider.
pub struct MemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    state_tx: watch::Sender<AuthState>,
    next_uid: AtomicU64,
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthProvider {
    /// Build a provider with no accounts, in the resolving state.
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(AuthState::Resolving);
        Self {
            accounts: Mutex::new(HashMap::new()),
            state_tx,
            next_uid: AtomicU64::new(1),
        }
    }

    fn lock_accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Report the persisted-session check: no session was found.
    pub fn resolve_signed_out(&self) {
        self.state_tx.send_replace(AuthState::SignedOut);
    }

    /// Report the persisted-session check: `identity` was restored.
    pub fn resolve_signed_in(&self, identity: Identity) {
        self.state_tx.send_replace(AuthState::SignedIn(identity));
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, AuthError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        let mut accounts = self.lock_accounts();
        if accounts.contains_key(email.as_ref()) {
            return Err(AuthError::EmailInUse);
        }
        let seq = self.next_uid.fetch_add(1, Ordering::SeqCst);
        let identity = Identity {
            uid: IdentityId::new(format!("uid-{seq:06}"))
                .map_err(|err| AuthError::provider(err.to_string()))?,
            email: email.clone(),
            display_name: None,
        };
        accounts.insert(
            email.as_ref().to_owned(),
            Account {
                identity: identity.clone(),
                password: password.to_owned(),
            },
        );
        drop(accounts);
        // Creating an account signs the session in as the new identity,
        // matching the hosted provider.
        self.state_tx
            .send_replace(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let identity = {
            let accounts = self.lock_accounts();
            let account = accounts
                .get(credentials.email().as_ref())
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password != credentials.password() {
                return Err(AuthError::InvalidCredentials);
            }
            account.identity.clone()
        };
        self.state_tx
            .send_replace(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }

    async fn update_display_name(&self, display_name: &str) -> Result<(), AuthError> {
        let current = self
            .state_tx
            .borrow()
            .identity()
            .cloned()
            .ok_or(AuthError::IdentityNotFound)?;
        let mut accounts = self.lock_accounts();
        let account = accounts
            .get_mut(current.email.as_ref())
            .ok_or(AuthError::IdentityNotFound)?;
        account.identity.display_name = Some(display_name.to_owned());
        let updated = account.identity.clone();
        drop(accounts);
        self.state_tx.send_replace(AuthState::SignedIn(updated));
        Ok(())
    }

    async fn delete_identity(&self, uid: &IdentityId) -> Result<(), AuthError> {
        let mut accounts = self.lock_accounts();
        let email = accounts
            .values()
            .find(|account| &account.identity.uid == uid)
            .map(|account| account.identity.email.as_ref().to_owned())
            .ok_or(AuthError::IdentityNotFound)?;
        accounts.remove(&email);
        drop(accounts);
        let signed_in_as_deleted = self
            .state_tx
            .borrow()
            .identity()
            .is_some_and(|identity| &identity.uid == uid);
        if signed_in_as_deleted {
            self.state_tx.send_replace(AuthState::SignedOut);
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    fn current_identity(&self) -> Option<Identity> {
        self.state_tx.borrow().identity().cloned()
    }
}
