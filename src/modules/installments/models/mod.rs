pub mod installment_moviment;

pub use installment_moviment::{CreateInstallmentMovimentCommand, InstallmentMoviment};
