pub mod job_runner;
pub mod posting_scheduler;

pub use job_runner::{JobRunner, RunSummary};
pub use posting_scheduler::PostingScheduler;
