//! User account repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users;
use crate::entities::users::UserRole;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// User domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub refresh_token: Option<String>,
    pub last_login: Option<time::OffsetDateTime>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<users::Model> for User {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            password_hash: m.password_hash,
            role: m.role,
            is_active: m.is_active,
            refresh_token: m.refresh_token,
            last_login: m.last_login,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_email(conn, email)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

/// Load user by ID or fail with a typed NotFound.
pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
) -> Result<User, DomainError> {
    find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: users_adapter::UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(User::from(user))
}

pub async fn set_refresh_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    refresh_token: Option<String>,
) -> Result<(), DomainError> {
    users_adapter::set_refresh_token(conn, user_id, refresh_token)
        .await
        .map_err(map_db_err)
}

/// Login bookkeeping: refresh slot and `last_login` land in one update.
pub async fn record_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    refresh_token: &str,
    at: time::OffsetDateTime,
) -> Result<(), DomainError> {
    users_adapter::record_login(conn, user_id, refresh_token, at)
        .await
        .map_err(map_db_err)
}

pub async fn set_password_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: Uuid,
    password_hash: &str,
) -> Result<(), DomainError> {
    users_adapter::set_password_hash(conn, user_id, password_hash)
        .await
        .map_err(map_db_err)
}
