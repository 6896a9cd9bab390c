//! Refresh Token Ledger: hash-only storage of refresh secrets with
//! rotation lineage and revocation.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod secret;
pub mod service;
pub mod store;

pub use error::LedgerError;
pub use memory::MemoryRefreshTokenStore;
pub use service::{IssuedRefreshToken, RefreshTokenLedger};
pub use store::RefreshTokenStore;
