//! SeaORM adapter for user accounts - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::users;

pub mod dto;

pub use dto::UserCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(dto.name),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        role: Set(dto.role),
        is_active: Set(true),
        refresh_token: Set(None),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user_active.insert(conn).await
}

/// Overwrite the stored refresh token slot. `None` clears it (logout).
pub async fn set_refresh_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    refresh_token: Option<String>,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    users::Entity::update_many()
        .col_expr(users::Column::RefreshToken, Expr::val(refresh_token).into())
        .col_expr(users::Column::UpdatedAt, Expr::val(now).into())
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Store the freshly minted refresh token and stamp the login time in a
/// single update.
pub async fn record_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    refresh_token: &str,
    at: time::OffsetDateTime,
) -> Result<(), sea_orm::DbErr> {
    users::Entity::update_many()
        .col_expr(
            users::Column::RefreshToken,
            Expr::val(Some(refresh_token.to_owned())).into(),
        )
        .col_expr(users::Column::LastLogin, Expr::val(Some(at)).into())
        .col_expr(users::Column::UpdatedAt, Expr::val(at).into())
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    password_hash: &str,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    users::Entity::update_many()
        .col_expr(users::Column::PasswordHash, Expr::val(password_hash).into())
        .col_expr(users::Column::UpdatedAt, Expr::val(now).into())
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}
