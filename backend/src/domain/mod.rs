//! Domain layer: entities, ports and the application services behind the
//! HTTP surface.

pub mod announcement;
pub mod announcement_board;
pub mod document_request;
pub mod error;
pub mod guard;
pub mod identity;
pub mod ports;
pub mod registration;
pub mod report;
pub mod report_service;
pub mod request_service;
pub mod resident;
pub mod role;
pub mod session;

pub use announcement::{Announcement, AnnouncementCategory, NewAnnouncement};
pub use announcement_board::AnnouncementBoard;
pub use document_request::{
    DocumentRequest, DocumentType, RecordId, RequestStatus, TransitionError,
};
pub use error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use guard::{decide, Area, GuardDecision, GuardKind};
pub use identity::{Credentials, EmailAddress, Identity, IdentityId, IdentityValidationError};
pub use registration::{NewStaffAccount, RegistrationService};
pub use report::{DocumentReport, ResidentReport};
pub use report_service::ReportService;
pub use request_service::{DocumentRequestService, RequestSubmission};
pub use resident::{CivilStatus, Gender, Resident, ResidentProfile};
pub use role::{Role, RoleLookup, StaffGrade, StaffRecord};
pub use session::{SessionManager, SessionSnapshot};
