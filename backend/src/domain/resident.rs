//! Resident profile records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::{EmailAddress, IdentityId};

/// Gender recorded on a resident profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Civil status recorded on a resident profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CivilStatus {
    Single,
    Married,
    Widowed,
    Divorced,
}

/// Resident profile stored in the `residents` collection.
///
/// ## Invariants
/// - `id` equals the identity uid of the account the profile belongs to, so
///   one profile corresponds to at most one identity.
/// - Updates overwrite in place; profiles are never versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Identity uid; doubles as the document id.
    #[schema(value_type = String)]
    pub id: IdentityId,
    /// Full name.
    pub name: String,
    /// Date of birth, when provided at sign-up.
    pub date_of_birth: Option<NaiveDate>,
    /// Recorded gender.
    pub gender: Gender,
    /// Street address.
    pub address: String,
    /// Barangay of residence.
    pub barangay: String,
    /// Contact number.
    pub phone: String,
    /// Email the account was registered with.
    #[schema(value_type = String)]
    pub email: EmailAddress,
    /// Recorded civil status.
    pub civil_status: CivilStatus,
    /// Occupation, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last overwritten.
    pub updated_at: DateTime<Utc>,
    /// Identity that created the profile (self at sign-up, staff otherwise).
    #[schema(value_type = String)]
    pub created_by: IdentityId,
}

/// Optional profile details a resident may supply at sign-up.
///
/// Missing fields fall back to the same defaults the original intake form
/// used: empty strings, `Gender::Other` and `CivilStatus::Single`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentProfile {
    /// Full name override; defaults to the sign-up display name.
    pub name: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Recorded gender.
    pub gender: Option<Gender>,
    /// Street address.
    pub address: Option<String>,
    /// Barangay of residence.
    pub barangay: Option<String>,
    /// Contact number.
    pub phone: Option<String>,
    /// Recorded civil status.
    pub civil_status: Option<CivilStatus>,
    /// Occupation.
    pub occupation: Option<String>,
}

impl Resident {
    /// Build a profile for a freshly signed-up identity.
    pub fn from_signup(
        uid: IdentityId,
        email: EmailAddress,
        display_name: &str,
        profile: ResidentProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uid.clone(),
            name: profile.name.unwrap_or_else(|| display_name.to_owned()),
            date_of_birth: profile.date_of_birth,
            gender: profile.gender.unwrap_or(Gender::Other),
            address: profile.address.unwrap_or_default(),
            barangay: profile.barangay.unwrap_or_default(),
            phone: profile.phone.unwrap_or_default(),
            email,
            civil_status: profile.civil_status.unwrap_or(CivilStatus::Single),
            occupation: profile.occupation,
            created_at: now,
            updated_at: now,
            created_by: uid,
        }
    }
}
