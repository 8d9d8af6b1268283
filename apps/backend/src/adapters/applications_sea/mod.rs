//! SeaORM adapter for job applications - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::job_applications;

pub mod dto;

pub use dto::{ApplicationCreate, ApplicationUpdate};

// Adapter functions return DbErr; the repos layer maps them to DomainError.

/// Helper: Apply optimistic update with lock version check, then refetch.
///
/// This consolidates the repetitive pattern:
/// - Adds lock_version increment and updated_at to the update
/// - Filters by id and expected_version
/// - Checks rows_affected to distinguish NotFound vs OptimisticLock
/// - Refetches and returns the updated model
///
/// The caller provides a closure that configures the column updates.
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    configure_update: F,
) -> Result<job_applications::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(
        sea_orm::UpdateMany<job_applications::Entity>,
    ) -> sea_orm::UpdateMany<job_applications::Entity>,
{
    use sea_orm::sea_query::Expr;

    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(job_applications::Entity::update_many())
        .col_expr(job_applications::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            job_applications::Column::LockVersion,
            Expr::col(job_applications::Column::LockVersion).add(1),
        )
        .filter(job_applications::Column::Id.eq(id))
        .filter(job_applications::Column::LockVersion.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the row is gone or the lock version doesn't match.
        let application = job_applications::Entity::find_by_id(id).one(conn).await?;
        if let Some(application) = application {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, application.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        } else {
            return Err(sea_orm::DbErr::RecordNotFound(
                "Application not found".to_string(),
            ));
        }
    }

    job_applications::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Application not found".to_string()))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
) -> Result<Option<job_applications::Model>, sea_orm::DbErr> {
    job_applications::Entity::find_by_id(application_id)
        .one(conn)
        .await
}

/// Find application by ID or return RecordNotFound error.
pub async fn find_by_job_and_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
    candidate_id: Uuid,
) -> Result<Option<job_applications::Model>, sea_orm::DbErr> {
    job_applications::Entity::find()
        .filter(job_applications::Column::JobId.eq(job_id))
        .filter(job_applications::Column::CandidateId.eq(candidate_id))
        .one(conn)
        .await
}

pub async fn list_by_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    candidate_id: Uuid,
) -> Result<Vec<job_applications::Model>, sea_orm::DbErr> {
    job_applications::Entity::find()
        .filter(job_applications::Column::CandidateId.eq(candidate_id))
        .order_by_desc(job_applications::Column::AppliedAt)
        .all(conn)
        .await
}

/// Insert a new application in `pending`. The unique (job_id, candidate_id)
/// index rejects a second submission for the same pair.
pub async fn create_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ApplicationCreate,
) -> Result<job_applications::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let application_active = job_applications::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(dto.job_id),
        candidate_id: Set(dto.candidate_id),
        cover_letter: Set(dto.cover_letter),
        status: Set(job_applications::ApplicationStatus::Pending),
        applied_at: Set(now),
        reviewed_at: Set(None),
        reviewed_by: Set(None),
        notes: Set(None),
        score: Set(None),
        interview_date: Set(None),
        interview_notes: Set(None),
        rejection_reason: Set(None),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    application_active.insert(conn).await
}

pub async fn update_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ApplicationUpdate,
) -> Result<job_applications::Model, sea_orm::DbErr> {
    use sea_orm::sea_query::Expr;

    optimistic_update_then_fetch(conn, dto.id, dto.expected_version, |mut update| {
        if let Some(status) = dto.status {
            update = update.col_expr(job_applications::Column::Status, Expr::val(status).into());
        }
        if let Some(at) = dto.reviewed_at {
            update = update.col_expr(
                job_applications::Column::ReviewedAt,
                Expr::val(Some(at)).into(),
            );
        }
        if let Some(by) = dto.reviewed_by {
            update = update.col_expr(
                job_applications::Column::ReviewedBy,
                Expr::val(Some(by)).into(),
            );
        }
        if let Some(notes) = dto.notes {
            update = update.col_expr(
                job_applications::Column::Notes,
                Expr::val(Some(notes)).into(),
            );
        }
        if let Some(score) = dto.score {
            update = update.col_expr(
                job_applications::Column::Score,
                Expr::val(Some(score)).into(),
            );
        }
        if let Some(date) = dto.interview_date {
            update = update.col_expr(
                job_applications::Column::InterviewDate,
                Expr::val(Some(date)).into(),
            );
        }
        if let Some(notes) = dto.interview_notes {
            update = update.col_expr(
                job_applications::Column::InterviewNotes,
                Expr::val(Some(notes)).into(),
            );
        }
        if let Some(reason) = dto.rejection_reason {
            update = update.col_expr(
                job_applications::Column::RejectionReason,
                Expr::val(Some(reason)).into(),
            );
        }
        update
    })
    .await
}

/// Delete guarded by `lock_version`, mirroring `optimistic_update_then_fetch`:
/// a concurrent transition bumps the version and the stale delete matches
/// nothing.
pub async fn delete_application<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
    expected_version: i32,
) -> Result<(), sea_orm::DbErr> {
    let result = job_applications::Entity::delete_many()
        .filter(job_applications::Column::Id.eq(application_id))
        .filter(job_applications::Column::LockVersion.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let application = job_applications::Entity::find_by_id(application_id)
            .one(conn)
            .await?;
        if let Some(application) = application {
            let payload = format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                expected_version, application.lock_version
            );
            return Err(sea_orm::DbErr::Custom(payload));
        }
        return Err(sea_orm::DbErr::RecordNotFound(
            "Application not found".to_string(),
        ));
    }

    Ok(())
}
