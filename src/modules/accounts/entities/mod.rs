pub mod account_entity;

pub use account_entity::{AccountEntity, AccountRow, MovimentEntity};
