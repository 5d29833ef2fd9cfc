//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod board_repo;
pub mod list_repo;
pub mod task_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use board_repo::BoardRepo;
pub use list_repo::ListRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
