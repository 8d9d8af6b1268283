//! SeaORM adapters - the only layer that touches entities directly.

pub mod applications_sea;
pub mod candidates_sea;
pub mod jobs_sea;
pub mod users_sea;
