//! # coursehub-core
//!
//! Core crate for CourseHub. Contains configuration schemas, the unified
//! error system, and the traits implemented by the storage crates.
//!
//! This crate has **no** internal dependencies on other CourseHub crates.

pub mod config;
pub mod deadline;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
