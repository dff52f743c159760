/// Database access layer
///
/// Repositories are traits so the lifecycle coordinator and the auth gate
/// receive their registry explicitly instead of reaching for a global pool.
pub mod user_repo;
pub mod video_repo;

pub use user_repo::{PgUserRepository, UserRepository};
pub use video_repo::{PgVideoRepository, VideoRepository};
