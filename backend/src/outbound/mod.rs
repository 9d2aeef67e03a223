//! Outbound adapters implementing the domain ports.

pub mod memory;
pub mod store;

pub use memory::{MemoryAuthProvider, MemoryStore};
pub use store::HttpDocumentStore;
