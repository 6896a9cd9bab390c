//! Credential Store seam: user identity lookup and password verification.

pub mod database;
pub mod memory;
pub mod store;

pub use memory::MemoryCredentialStore;
pub use store::CredentialStore;
