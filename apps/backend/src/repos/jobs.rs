//! Job posting repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::jobs_sea as jobs_adapter;
use crate::entities::jobs;
use crate::entities::jobs::JobStatus;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Job domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub status: JobStatus,
    pub applications_count: i32,
    pub created_by: Option<Uuid>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl Job {
    pub fn is_published(&self) -> bool {
        self.status == JobStatus::Published
    }
}

impl From<jobs::Model> for Job {
    fn from(m: jobs::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            location: m.location,
            employment_type: m.employment_type,
            status: m.status,
            applications_count: m.applications_count,
            created_by: m.created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
) -> Result<Option<Job>, DomainError> {
    let job = jobs_adapter::find_by_id(conn, job_id)
        .await
        .map_err(map_db_err)?;
    Ok(job.map(Job::from))
}

/// Load job by ID or fail with a typed NotFound.
pub async fn require_job<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
) -> Result<Job, DomainError> {
    find_by_id(conn, job_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Job, "Job not found"))
}

pub async fn create_job<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: jobs_adapter::JobCreate,
) -> Result<Job, DomainError> {
    let job = jobs_adapter::create_job(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Job::from(job))
}

pub async fn adjust_applications_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
    delta: i32,
) -> Result<(), DomainError> {
    jobs_adapter::adjust_applications_count(conn, job_id, delta)
        .await
        .map_err(map_db_err)
}
