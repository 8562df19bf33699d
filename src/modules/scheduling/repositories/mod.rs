pub mod job_repository;

pub use job_repository::{JobQueue, MySqlJobQueue, RUNNING_LEASE_MINUTES};
