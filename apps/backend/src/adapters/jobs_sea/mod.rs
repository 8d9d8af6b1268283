//! SeaORM adapter for job postings - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::jobs;

/// DTO for creating a job posting.
#[derive(Debug, Clone)]
pub struct JobCreate {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub status: jobs::JobStatus,
    pub created_by: Option<Uuid>,
}

impl JobCreate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            employment_type: None,
            status: jobs::JobStatus::Draft,
            created_by: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: jobs::JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn by(mut self, user_id: Uuid) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
) -> Result<Option<jobs::Model>, sea_orm::DbErr> {
    jobs::Entity::find_by_id(job_id).one(conn).await
}

pub async fn create_job<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: JobCreate,
) -> Result<jobs::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let job_active = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(dto.title),
        description: Set(dto.description),
        location: Set(dto.location),
        employment_type: Set(dto.employment_type),
        status: Set(dto.status),
        applications_count: Set(0),
        created_by: Set(dto.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };

    job_active.insert(conn).await
}

/// Adjust the denormalized applications counter by `delta` (may be negative).
pub async fn adjust_applications_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    job_id: Uuid,
    delta: i32,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    jobs::Entity::update_many()
        .col_expr(
            jobs::Column::ApplicationsCount,
            Expr::col(jobs::Column::ApplicationsCount).add(delta),
        )
        .col_expr(jobs::Column::UpdatedAt, Expr::val(now).into())
        .filter(jobs::Column::Id.eq(job_id))
        .exec(conn)
        .await?;
    Ok(())
}
