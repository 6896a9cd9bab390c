//! Session lifecycle: login, refresh, logout.

pub mod manager;

pub use manager::{SessionManager, SessionTokens};
