//! # coursehub-database
//!
//! PostgreSQL connection management and repository implementations for
//! users, refresh tokens and lesson assets.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
