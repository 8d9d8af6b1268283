//! Candidate profile repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::candidates_sea as candidates_adapter;
use crate::entities::candidates;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Candidate domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<candidates::Model> for Candidate {
    fn from(m: candidates::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            phone: m.phone,
            resume_url: m.resume_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub async fn find_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<Candidate>, DomainError> {
    let candidate = candidates_adapter::find_by_user_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(candidate.map(Candidate::from))
}

/// Load the candidate profile owned by `user_id` or fail with a typed NotFound.
pub async fn require_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Candidate, DomainError> {
    find_by_user_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Candidate, "Candidate not found"))
}

pub async fn create_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    phone: Option<String>,
    resume_url: Option<String>,
) -> Result<Candidate, DomainError> {
    let candidate = candidates_adapter::create_candidate(conn, user_id, phone, resume_url)
        .await
        .map_err(map_db_err)?;
    Ok(Candidate::from(candidate))
}
