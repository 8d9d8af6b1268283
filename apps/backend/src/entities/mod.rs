pub mod candidates;
pub mod job_applications;
pub mod jobs;
pub mod users;
