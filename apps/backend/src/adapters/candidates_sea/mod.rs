//! SeaORM adapter for candidate profiles - generic over ConnectionTrait.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::candidates;

pub async fn find_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<candidates::Model>, sea_orm::DbErr> {
    candidates::Entity::find()
        .filter(candidates::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn create_candidate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    phone: Option<String>,
    resume_url: Option<String>,
) -> Result<candidates::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let candidate_active = candidates::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        phone: Set(phone),
        resume_url: Set(resume_url),
        created_at: Set(now),
        updated_at: Set(now),
    };

    candidate_active.insert(conn).await
}
