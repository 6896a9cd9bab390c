//! Refresh-token ledger entities.

pub mod refresh;

pub use refresh::{NewRefreshToken, RefreshToken};
