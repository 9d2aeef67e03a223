//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AnnouncementRepository, ResidentRepository, StaffDirectory};
use crate::domain::{
    AnnouncementBoard, DocumentRequestService, RegistrationService, ReportService,
    SessionManager,
};

/// Service and port handles the HTTP layer depends on.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication state and role resolution.
    pub sessions: Arc<SessionManager>,
    /// Resident sign-up and admin staff provisioning.
    pub registration: Arc<RegistrationService>,
    /// Document request submission and review lifecycle.
    pub requests: Arc<DocumentRequestService>,
    /// On-demand report computation.
    pub reports: Arc<ReportService>,
    /// Staff announcement list with delete-with-undo.
    pub board: Arc<AnnouncementBoard>,
    /// Resident profile collection.
    pub residents: Arc<dyn ResidentRepository>,
    /// Staff directory collection.
    pub staff: Arc<dyn StaffDirectory>,
    /// Announcement collection, read directly for resident views.
    pub announcements: Arc<dyn AnnouncementRepository>,
    /// Time source for update stamps.
    pub clock: Arc<dyn Clock>,
}
