//! Repository implementations for CourseHub entities.

pub mod lesson_asset;
pub mod refresh_token;
pub mod user;

pub use lesson_asset::LessonAssetRepository;
pub use refresh_token::RefreshTokenRepository;
pub use user::UserRepository;
