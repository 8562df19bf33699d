pub mod installment_expander;
pub mod installment_service;

pub use installment_expander::{InstallmentExpander, ScheduledPosting};
pub use installment_service::{InstallmentCreated, InstallmentService};
