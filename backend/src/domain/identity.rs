//! Authenticated principals and credential primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors raised by identity and credential constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// Identifier was missing or blank once trimmed.
    EmptyId,
    /// Identifier contained surrounding whitespace.
    UntrimmedId,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email did not contain a local part and a domain.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identity id must not be empty"),
            Self::UntrimmedId => write!(f, "identity id must not contain surrounding whitespace"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a local part and a domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Opaque identifier assigned by the authentication provider.
///
/// Provider uids are free-form strings, not UUIDs, so the only invariants are
/// non-emptiness and the absence of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(String);

impl IdentityId {
    /// Validate and construct an [`IdentityId`] from borrowed input.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::UntrimmedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IdentityId> for String {
    fn from(value: IdentityId) -> Self {
        value.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated email address.
///
/// ## Invariants
/// - trimmed and non-empty;
/// - contains exactly one `@` with non-empty text either side.
///
/// Full RFC validation is the provider's job; this only rejects obviously
/// malformed input before a network round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated principal managed by the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned unique identifier.
    pub uid: IdentityId,
    /// Email the account was registered with.
    pub email: EmailAddress,
    /// Display name, when one has been set.
    pub display_name: Option<String>,
}

/// Validated sign-in/sign-up credentials.
///
/// The password retains caller-provided whitespace to avoid surprising
/// credential comparisons, and is zeroised on drop.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email the caller is authenticating as.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
