pub mod currency;
pub mod error;
pub mod ids;

pub use currency::Currency;
pub use error::{AppError, Result};
pub use ids::parse_id;
