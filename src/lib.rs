//! finsys personal finance backend library
//!
//! Installment commitments, their expansion into monthly postings, and the
//! scheduled balance updates that apply those postings to accounts.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::accounts;
pub use modules::installments;
pub use modules::scheduling;
