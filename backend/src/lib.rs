//! Barangay portal backend.
//!
//! Hexagonal layout: `domain` holds the entities, ports and services,
//! `inbound` exposes the HTTP surface, `outbound` implements the store and
//! auth provider adapters.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
