//! Role resolution for authenticated identities.
//!
//! A role is never stored on the identity itself. It is derived by probing
//! two collections in sequence: a staff record in the staff directory wins,
//! otherwise a resident profile marks the identity as a resident, otherwise
//! the role is unknown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::{EmailAddress, IdentityId};

/// Portal area a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Staff or admin account recorded in the staff directory.
    Staff,
    /// Resident account with a profile in the residents collection.
    Resident,
}

/// Grade recorded on a staff directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffGrade {
    /// Full administrative access, including staff provisioning.
    Admin,
    /// Regular staff access.
    Staff,
}

/// Entry in the staff directory (`users` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    /// Identity the record belongs to; doubles as the document id.
    #[schema(value_type = String)]
    pub uid: IdentityId,
    /// Email the account was registered with.
    #[schema(value_type = String)]
    pub email: EmailAddress,
    /// Staff member's display name.
    pub name: String,
    /// Admin or regular staff.
    pub grade: StaffGrade,
    /// When the record was provisioned.
    pub created_at: DateTime<Utc>,
    /// Admin who provisioned the account, when created through the portal.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_by: Option<IdentityId>,
}

/// Outcome of probing the staff and resident collections for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleLookup {
    /// The identity has a staff directory entry.
    Staff(StaffRecord),
    /// The identity has a resident profile.
    Resident,
    /// The identity appears in neither collection.
    #[default]
    Unknown,
}

impl RoleLookup {
    /// Collapse the lookup into a plain role, when one was found.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Staff(_) => Some(Role::Staff),
            Self::Resident => Some(Role::Resident),
            Self::Unknown => None,
        }
    }

    /// True when the lookup found a staff record.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff(_))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn staff_record() -> StaffRecord {
        StaffRecord {
            uid: IdentityId::new("staff-1").expect("fixture uid"),
            email: EmailAddress::new("clerk@barangay.ph").expect("fixture email"),
            name: "Clerk".to_owned(),
            grade: StaffGrade::Staff,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    #[rstest]
    #[case(RoleLookup::Resident, Some(Role::Resident))]
    #[case(RoleLookup::Unknown, None)]
    fn lookup_collapses_to_role(#[case] lookup: RoleLookup, #[case] expected: Option<Role>) {
        assert_eq!(lookup.role(), expected);
    }

    #[test]
    fn staff_lookup_is_staff() {
        let lookup = RoleLookup::Staff(staff_record());
        assert_eq!(lookup.role(), Some(Role::Staff));
        assert!(lookup.is_staff());
    }

    #[test]
    fn grades_serialise_as_snake_case() {
        let value = serde_json::to_value(StaffGrade::Admin).expect("serialisable");
        assert_eq!(value, serde_json::json!("admin"));
    }
}
