//! Service layer - business rules on top of repos.

pub mod applications;
pub mod auth;
