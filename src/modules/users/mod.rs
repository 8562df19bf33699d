pub mod models;
pub mod repositories;

pub use models::User;
pub use repositories::{MySqlUserRepository, UserEntity, UserRepository};
