//! # coursehub-entity
//!
//! Domain entity models for CourseHub. Database rows derive
//! `sqlx::FromRow`; value objects such as webhook events are transient
//! and never persisted.

pub mod lesson;
pub mod token;
pub mod user;
pub mod webhook;
