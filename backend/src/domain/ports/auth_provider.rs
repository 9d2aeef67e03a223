//! Port for the hosted identity provider.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::identity::{Credentials, EmailAddress, Identity, IdentityId};

/// What the provider currently knows about the signed-in identity.
///
/// Providers restore persisted sessions asynchronously, so consumers start in
/// [`AuthState::Resolving`] and must not treat the identity as absent until
/// the provider has reported a definitive state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not yet reported whether a session is persisted.
    Resolving,
    /// No identity is signed in.
    SignedOut,
    /// An identity is signed in.
    SignedIn(Identity),
}

impl AuthState {
    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Resolving | Self::SignedOut => None,
        }
    }

    /// Whether the provider has reported a definitive state.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Resolving)
    }
}

/// Failures raised by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email or password did not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The email is already registered.
    #[error("an account already exists for this email")]
    EmailInUse,
    /// The password does not meet the provider's strength rules.
    #[error("password does not meet the minimum requirements")]
    WeakPassword,
    /// No identity exists for the given uid.
    #[error("no identity found for this account")]
    IdentityNotFound,
    /// The provider failed for reasons outside the caller's control.
    #[error("identity provider error: {message}")]
    Provider {
        /// Provider-reported detail.
        message: String,
    },
}

impl AuthError {
    /// Build an [`AuthError::Provider`].
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

impl From<AuthError> for crate::domain::Error {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::unauthorized("invalid email or password"),
            AuthError::EmailInUse => {
                Self::conflict("an account already exists for this email")
            }
            AuthError::WeakPassword => {
                Self::invalid_request("password does not meet the minimum requirements")
            }
            AuthError::IdentityNotFound => Self::not_found("no identity found for this account"),
            AuthError::Provider { message } => {
                Self::service_unavailable(format!("identity provider error: {message}"))
            }
        }
    }
}

/// Hosted identity provider: account lifecycle plus a broadcast of the
/// current authentication state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<Identity, AuthError>;

    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// Sign out the current identity. Succeeds when nobody is signed in.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Set the display name on the currently signed-in identity.
    async fn update_display_name(&self, display_name: &str) -> Result<(), AuthError>;

    /// Delete an identity outright. Used to unwind failed staff creation.
    async fn delete_identity(&self, uid: &IdentityId) -> Result<(), AuthError>;

    /// Subscribe to authentication state changes. The receiver always holds
    /// the latest state; new subscribers see [`AuthState::Resolving`] until
    /// the provider has checked for a persisted session.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// The identity signed in right now, if the state has resolved to one.
    fn current_identity(&self) -> Option<Identity> {
        self.subscribe().borrow().identity().cloned()
    }
}
