//! Request extractors.

pub mod current_user;
