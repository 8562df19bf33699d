pub mod accounts;
pub mod balances;
pub mod health;
pub mod installments;
pub mod moviments;
pub mod scheduling;
pub mod users;
