pub mod repositories;
pub mod services;

pub use repositories::BalanceRepository;
pub use services::{BalanceService, BalanceUpdater};
