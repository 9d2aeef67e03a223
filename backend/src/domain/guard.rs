//! Route guard decisions.
//!
//! Three guard variants share one protocol: wait for session initialization,
//! then read the identity and role exactly once and either allow activation
//! or redirect to the area the session belongs in. The decision is a pure
//! function so the full matrix can be tested without any transport.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::role::Role;

/// Navigation targets a guard can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    /// Login screen for unauthenticated sessions.
    Login,
    /// Generic dashboard for authenticated sessions with no recorded role.
    Dashboard,
    /// Staff area.
    StaffDashboard,
    /// Resident area.
    ResidentDashboard,
}

impl Area {
    /// Path the SPA shell navigates to for this area.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::StaffDashboard => "/staff/dashboard",
            Self::ResidentDashboard => "/resident/dashboard",
        }
    }
}

/// Guard variant being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    /// Catch-all dispatcher: never allows activation, only redirects
    /// authenticated sessions to their correct area. This is deliberate.
    Generic,
    /// Gates the staff area.
    Staff,
    /// Gates the resident area.
    Resident,
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Activation may proceed.
    Allow,
    /// Activation is denied; navigate to the given area instead.
    Redirect(Area),
}

/// Evaluate a guard against the session's identity presence and role.
///
/// Callers must only invoke this after session initialization has completed;
/// evaluating against the default "no user" state would redirect a session
/// whose persisted identity has simply not been restored yet.
pub fn decide(kind: GuardKind, identity_present: bool, role: Option<Role>) -> GuardDecision {
    if !identity_present {
        return GuardDecision::Redirect(Area::Login);
    }
    match (kind, role) {
        (GuardKind::Generic, Some(Role::Staff)) => GuardDecision::Redirect(Area::StaffDashboard),
        (GuardKind::Generic, Some(Role::Resident)) => {
            GuardDecision::Redirect(Area::ResidentDashboard)
        }
        (GuardKind::Generic, None) => GuardDecision::Redirect(Area::Dashboard),
        (GuardKind::Staff, Some(Role::Staff)) => GuardDecision::Allow,
        (GuardKind::Staff, _) => GuardDecision::Redirect(Area::ResidentDashboard),
        (GuardKind::Resident, Some(Role::Resident)) => GuardDecision::Allow,
        (GuardKind::Resident, Some(Role::Staff)) => {
            GuardDecision::Redirect(Area::ResidentDashboard)
        }
        (GuardKind::Resident, None) => GuardDecision::Redirect(Area::StaffDashboard),
    }
}
