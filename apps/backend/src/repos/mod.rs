//! Repository functions for the domain layer.

pub mod applications;
pub mod candidates;
pub mod jobs;
pub mod users;
