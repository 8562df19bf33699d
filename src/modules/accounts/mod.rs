pub mod controllers;
pub mod entities;
pub mod mappings;
pub mod models;
pub mod repositories;

pub use controllers::get_account;
pub use entities::{AccountEntity, MovimentEntity};
pub use mappings::map_account;
pub use models::Account;
pub use repositories::{AccountRepository, MySqlAccountRepository};
