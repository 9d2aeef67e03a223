//! Session manager: authentication state, role resolution and the
//! initialisation gate.
//!
//! The identity provider restores persisted sessions asynchronously, so the
//! manager exposes an `initialized` latch that flips to `true` only after the
//! provider has reported its first definitive state. Consumers that need the
//! current identity must await [`SessionManager::wait_until_initialized`]
//! first; reading earlier would mistake "still resolving" for "signed out".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::warn;

use crate::domain::error::Error;
use crate::domain::identity::{Credentials, Identity};
use crate::domain::ports::store::StoreError;
use crate::domain::ports::{AuthProvider, AuthState, ResidentRepository, StaffDirectory};
use crate::domain::role::{Role, RoleLookup};

/// Identity and role as currently known to the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// The signed-in identity, once resolved.
    pub identity: Option<Identity>,
    /// What the portal collections say about that identity.
    pub lookup: RoleLookup,
}

impl SessionSnapshot {
    fn signed_out() -> Self {
        Self::default()
    }

    /// The resolved portal role, if any.
    pub fn role(&self) -> Option<Role> {
        self.lookup.role()
    }
}

/// Resolve an identity's portal role by probing the staff directory first and
/// the resident collection second. Membership decides the role; an identity
/// in neither collection is [`RoleLookup::Unknown`].
pub async fn resolve_role(
    staff: &dyn StaffDirectory,
    residents: &dyn ResidentRepository,
    identity: &Identity,
) -> Result<RoleLookup, StoreError> {
    if let Some(record) = staff.find_by_id(&identity.uid).await? {
        return Ok(RoleLookup::Staff(record));
    }
    if residents.find_by_id(&identity.uid).await?.is_some() {
        return Ok(RoleLookup::Resident);
    }
    Ok(RoleLookup::Unknown)
}

/// Tracks who is signed in and what role they hold.
pub struct SessionManager {
    auth: Arc<dyn AuthProvider>,
    staff: Arc<dyn StaffDirectory>,
    residents: Arc<dyn ResidentRepository>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    initialized_tx: watch::Sender<bool>,
    listener_started: AtomicBool,
}

impl SessionManager {
    /// Build a manager over the given provider and collections. Call
    /// [`Self::initialize`] before reading any session state.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        staff: Arc<dyn StaffDirectory>,
        residents: Arc<dyn ResidentRepository>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        let (initialized_tx, _) = watch::channel(false);
        Self {
            auth,
            staff,
            residents,
            snapshot_tx,
            initialized_tx,
            listener_started: AtomicBool::new(false),
        }
    }

    /// Start listening to the provider's authentication state. Idempotent;
    /// only the first call spawns the listener.
    pub fn initialize(&self) {
        if self.listener_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut rx = self.auth.subscribe();
        let staff = Arc::clone(&self.staff);
        let residents = Arc::clone(&self.residents);
        let snapshot_tx = self.snapshot_tx.clone();
        let initialized_tx = self.initialized_tx.clone();
        tokio::spawn(async move {
            loop {
                let state = rx.borrow_and_update().clone();
                match state {
                    AuthState::Resolving => {}
                    AuthState::SignedOut => {
                        snapshot_tx.send_replace(SessionSnapshot::signed_out());
                        initialized_tx.send_replace(true);
                    }
                    AuthState::SignedIn(identity) => {
                        let lookup =
                            match resolve_role(staff.as_ref(), residents.as_ref(), &identity)
                                .await
                            {
                                Ok(lookup) => lookup,
                                Err(err) => {
                                    warn!(
                                        uid = %identity.uid,
                                        error = %err,
                                        "role lookup failed; treating identity as unknown"
                                    );
                                    RoleLookup::Unknown
                                }
                            };
                        snapshot_tx.send_replace(SessionSnapshot {
                            identity: Some(identity),
                            lookup,
                        });
                        initialized_tx.send_replace(true);
                    }
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    }

    /// Whether the provider has reported its first definitive state.
    pub fn is_initialized(&self) -> bool {
        *self.initialized_tx.borrow()
    }

    /// Wait until the provider has reported its first definitive state.
    pub async fn wait_until_initialized(&self) {
        let mut rx = self.initialized_tx.subscribe();
        // The sender lives on self, so wait_for cannot observe a closed
        // channel while the manager is alive.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Subscribe to session snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The current snapshot. Meaningful only after initialisation.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Sign in and verify the account holds the role the caller's portal
    /// expects. On a mismatch the provider session is torn down before the
    /// error is returned, so no half-signed-in state survives.
    pub async fn login(
        &self,
        credentials: &Credentials,
        expected_role: Role,
    ) -> Result<SessionSnapshot, Error> {
        let identity = self.auth.sign_in(credentials).await?;
        let lookup = resolve_role(self.staff.as_ref(), self.residents.as_ref(), &identity)
            .await
            .map_err(Error::from)?;
        if let Some(err) = Self::role_mismatch(expected_role, &lookup) {
            if let Err(sign_out_err) = self.auth.sign_out().await {
                warn!(error = %sign_out_err, "sign-out after role mismatch failed");
            }
            self.snapshot_tx.send_replace(SessionSnapshot::signed_out());
            return Err(err);
        }
        let snapshot = SessionSnapshot {
            identity: Some(identity),
            lookup,
        };
        self.snapshot_tx.send_replace(snapshot.clone());
        self.initialized_tx.send_replace(true);
        Ok(snapshot)
    }

    fn role_mismatch(expected: Role, lookup: &RoleLookup) -> Option<Error> {
        match (expected, lookup.role()) {
            (Role::Staff, Some(Role::Staff)) | (Role::Resident, Some(Role::Resident)) => None,
            (Role::Staff, Some(Role::Resident)) => Some(Error::forbidden(
                "this account is registered as a resident; use the resident portal to sign in",
            )),
            (Role::Resident, Some(Role::Staff)) => Some(Error::forbidden(
                "this account is registered as staff; use the staff portal to sign in",
            )),
            (_, None) => Some(Error::forbidden(
                "no portal profile exists for this account",
            )),
        }
    }

    /// Sign out and clear the snapshot.
    pub async fn logout(&self) -> Result<(), Error> {
        self.auth.sign_out().await?;
        self.snapshot_tx.send_replace(SessionSnapshot::signed_out());
        Ok(())
    }
}
