pub mod scheduled_job;

pub use scheduled_job::{EnqueueOutcome, JobStatus, ScheduleReport, ScheduledJob};
