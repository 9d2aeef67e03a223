//! Outbound ports the domain services depend on.
//!
//! Each port is an async trait implemented by an adapter in `outbound`;
//! tests substitute `mockall` mocks.

pub mod announcement_repository;
pub mod auth_provider;
pub mod document_request_repository;
pub mod resident_repository;
pub mod staff_directory;
pub mod store;

pub use announcement_repository::AnnouncementRepository;
pub use auth_provider::{AuthError, AuthProvider, AuthState};
pub use document_request_repository::{DocumentRequestRepository, NewDocumentRequest};
pub use resident_repository::ResidentRepository;
pub use staff_directory::StaffDirectory;
pub use store::StoreError;

#[cfg(test)]
pub use announcement_repository::MockAnnouncementRepository;
#[cfg(test)]
pub use auth_provider::MockAuthProvider;
#[cfg(test)]
pub use document_request_repository::MockDocumentRequestRepository;
#[cfg(test)]
pub use resident_repository::MockResidentRepository;
#[cfg(test)]
pub use staff_directory::MockStaffDirectory;
