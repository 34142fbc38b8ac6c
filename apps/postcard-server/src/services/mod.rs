//! Request orchestration on top of the ports.

mod stats;
mod submission;

pub use stats::StatsService;
pub use submission::SubmissionService;
