//! # coursehub-auth
//!
//! Authentication and session lifecycle for CourseHub.
//!
//! ## Modules
//!
//! - `jwt`: stateless access-token signing and verification
//! - `password`: Argon2id password hashing
//! - `credentials`: user lookup and password verification seam
//! - `ledger`: hashed, rotating, revocable refresh tokens
//! - `session`: login, refresh and logout on top of the above

pub mod credentials;
pub mod jwt;
pub mod ledger;
pub mod password;
pub mod session;

pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use jwt::{AccessClaims, TokenCodec, TokenError};
pub use ledger::{LedgerError, MemoryRefreshTokenStore, RefreshTokenLedger, RefreshTokenStore};
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionTokens};

/// The single message every rejected credential, token or refresh secret maps to.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
