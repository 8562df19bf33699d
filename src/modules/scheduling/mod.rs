pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EnqueueOutcome, JobStatus, ScheduleReport, ScheduledJob};
pub use repositories::{JobQueue, MySqlJobQueue};
pub use services::{JobRunner, PostingScheduler, RunSummary};
