//! Job application repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::applications_sea as applications_adapter;
use crate::entities::job_applications;
use crate::entities::job_applications::ApplicationStatus;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Application domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: time::OffsetDateTime,
    pub reviewed_at: Option<time::OffsetDateTime>,
    pub reviewed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub score: Option<i32>,
    pub interview_date: Option<time::OffsetDateTime>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub lock_version: i32,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<job_applications::Model> for Application {
    fn from(m: job_applications::Model) -> Self {
        Self {
            id: m.id,
            job_id: m.job_id,
            candidate_id: m.candidate_id,
            cover_letter: m.cover_letter,
            status: m.status,
            applied_at: m.applied_at,
            reviewed_at: m.reviewed_at,
            reviewed_by: m.reviewed_by,
            notes: m.notes,
            score: m.score,
            interview_date: m.interview_date,
            interview_notes: m.interview_notes,
            rejection_reason: m.rejection_reason,
            lock_version: m.lock_version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
) -> Result<Option<Application>, DomainError> {
    let application = applications_adapter::find_by_id(conn, application_id)
        .await
        .map_err(map_db_err)?;
    Ok(application.map(Application::from))
}

/// Load application by ID or fail with a typed NotFound.
pub async fn require_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
) -> Result<Application, DomainError> {
    find_by_id(conn, application_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Application, "Application not found"))
}

pub async fn find_by_job_and_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<Option<Application>, DomainError> {
    let application = applications_adapter::find_by_job_and_candidate(conn, job_id, candidate_id)
        .await
        .map_err(map_db_err)?;
    Ok(application.map(Application::from))
}

pub async fn list_by_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    candidate_id: Uuid,
) -> Result<Vec<Application>, DomainError> {
    let applications = applications_adapter::list_by_candidate(conn, candidate_id)
        .await
        .map_err(map_db_err)?;
    Ok(applications.into_iter().map(Application::from).collect())
}

pub async fn create_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: applications_adapter::ApplicationCreate,
) -> Result<Application, DomainError> {
    let application = applications_adapter::create_application(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Application::from(application))
}

pub async fn update_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: applications_adapter::ApplicationUpdate,
) -> Result<Application, DomainError> {
    let application = applications_adapter::update_application(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Application::from(application))
}

/// Delete only when `expected_version` still matches; a lost race surfaces
/// as the optimistic-lock conflict.
pub async fn delete_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
    expected_version: i32,
) -> Result<(), DomainError> {
    applications_adapter::delete_application(conn, application_id, expected_version)
        .await
        .map_err(map_db_err)
}
