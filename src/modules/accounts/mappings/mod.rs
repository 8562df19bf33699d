pub mod account_mapper;

pub use account_mapper::{map_account, map_moviments};
