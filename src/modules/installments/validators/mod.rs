pub mod installment_validator;

pub use installment_validator::{
    InstallmentMovimentValidator, MAX_DESCRIPTION_LEN, MAX_MONTHS, MAX_START_MONTH,
};
