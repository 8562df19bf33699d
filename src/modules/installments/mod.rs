pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validators;

pub use controllers::{configure, create_installment};
pub use models::{CreateInstallmentMovimentCommand, InstallmentMoviment};
pub use repositories::{InstallmentRepository, MySqlInstallmentRepository};
pub use services::{InstallmentCreated, InstallmentExpander, InstallmentService, ScheduledPosting};
pub use validators::InstallmentMovimentValidator;
