pub mod error_handler;
pub mod request_id;

pub use error_handler::{json_config, ErrorHandler};
pub use request_id::RequestId;
