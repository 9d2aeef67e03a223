//! Account provisioning: resident self sign-up and admin staff creation.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, warn};

use crate::domain::error::Error;
use crate::domain::identity::{Credentials, EmailAddress, Identity, IdentityId};
use crate::domain::ports::{AuthProvider, ResidentRepository, StaffDirectory};
use crate::domain::resident::{Resident, ResidentProfile};
use crate::domain::role::{StaffGrade, StaffRecord};

/// Details an admin supplies when provisioning a staff account.
#[derive(Debug, Clone)]
pub struct NewStaffAccount {
    /// Email the account will sign in with.
    pub email: EmailAddress,
    /// Initial password.
    pub password: String,
    /// Staff member's display name.
    pub name: String,
    /// Admin or regular staff.
    pub grade: StaffGrade,
}

/// Creates provider accounts and their portal records.
pub struct RegistrationService {
    auth: Arc<dyn AuthProvider>,
    staff: Arc<dyn StaffDirectory>,
    residents: Arc<dyn ResidentRepository>,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    /// Build a service over the given provider and collections.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        staff: Arc<dyn StaffDirectory>,
        residents: Arc<dyn ResidentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            auth,
            staff,
            residents,
            clock,
        }
    }

    /// Register a resident account and its profile.
    ///
    /// The provider account is the source of truth: once it exists, a failure
    /// to set the display name or write the profile document is logged but
    /// does not fail the sign-up. The resident can complete the profile
    /// later; losing the account would strand the email address.
    pub async fn sign_up_resident(
        &self,
        email: &EmailAddress,
        password: &str,
        display_name: &str,
        profile: ResidentProfile,
    ) -> Result<(Identity, Resident), Error> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(Error::invalid_request("a display name is required"));
        }
        let identity = self.auth.sign_up(email, password).await?;
        if let Err(err) = self.auth.update_display_name(display_name).await {
            warn!(uid = %identity.uid, error = %err, "failed to set display name at sign-up");
        }
        let resident = Resident::from_signup(
            identity.uid.clone(),
            identity.email.clone(),
            display_name,
            profile,
            self.clock.utc(),
        );
        if let Err(err) = self.residents.upsert(&resident).await {
            error!(
                uid = %identity.uid,
                error = %err,
                "resident profile write failed after account creation"
            );
        }
        Ok((identity, resident))
    }

    /// Provision a staff account on behalf of an admin.
    ///
    /// Creating the provider account signs the session in as the new staff
    /// member, so the flow finishes by re-authenticating as the acting admin.
    /// If that re-authentication fails the new account is unwound best-effort
    /// and one consolidated error is returned; cleanup failures are logged
    /// without masking the original failure.
    pub async fn create_staff_as_admin(
        &self,
        acting_admin: &StaffRecord,
        admin_credentials: &Credentials,
        new_staff: NewStaffAccount,
    ) -> Result<StaffRecord, Error> {
        if acting_admin.grade != StaffGrade::Admin {
            return Err(Error::forbidden("only admins may provision staff accounts"));
        }
        let identity = self
            .auth
            .sign_up(&new_staff.email, &new_staff.password)
            .await?;
        if let Err(err) = self.auth.update_display_name(&new_staff.name).await {
            warn!(uid = %identity.uid, error = %err, "failed to set staff display name");
        }
        let record = StaffRecord {
            uid: identity.uid.clone(),
            email: new_staff.email,
            name: new_staff.name,
            grade: new_staff.grade,
            created_at: self.clock.utc(),
            created_by: Some(acting_admin.uid.clone()),
        };
        if let Err(err) = self.staff.upsert(&record).await {
            self.cleanup_identity(&identity.uid).await;
            return Err(Error::internal(format!(
                "staff record write failed: {err}"
            )));
        }
        if let Err(err) = self.auth.sign_in(admin_credentials).await {
            self.cleanup_identity(&identity.uid).await;
            if let Err(cleanup_err) = self.staff.delete(&identity.uid).await {
                warn!(
                    uid = %identity.uid,
                    error = %cleanup_err,
                    "failed to remove staff record while unwinding"
                );
            }
            return Err(Error::internal(format!(
                "staff account was provisioned but re-authenticating as the admin failed: {err}"
            )));
        }
        Ok(record)
    }

    async fn cleanup_identity(&self, uid: &IdentityId) {
        if let Err(err) = self.auth.delete_identity(uid).await {
            warn!(uid = %uid, error = %err, "failed to delete identity while unwinding");
        }
    }
}
