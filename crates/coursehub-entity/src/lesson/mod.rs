//! Lesson video-asset entities.

pub mod model;
pub mod status;

pub use model::{AssetUpdate, LessonAsset};
pub use status::AssetStatus;
