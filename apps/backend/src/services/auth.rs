//! Account lifecycle: registration, login, token rotation, password flows.

use std::sync::LazyLock;
use std::time::SystemTime;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapters::users_sea::UserCreate;
use crate::auth::jwt::{
    mint_access_token, mint_password_reset_token, mint_refresh_token, verify_password_reset_token,
    verify_refresh_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::{candidates, users};
use crate::state::app_state::AppState;
use crate::trace_ctx;

const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
    });
    &EMAIL
}

/// Lowercase and trim, so lookups and the unique index agree on a canonical
/// form.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email_pattern().is_match(email) {
        Ok(())
    } else {
        Err(AppError::validation(
            ErrorCode::InvalidEmail,
            "Please provide a valid email address",
        ))
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Sanitized account view: never exposes the password hash or the stored
/// refresh token.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<time::OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

impl From<users::User> for UserView {
    fn from(u: users::User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            last_login: u.last_login,
            created_at: u.created_at,
        }
    }
}

/// Access/refresh pair handed out by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
}

/// Create the account and, since self-registration is candidate-only, its
/// candidate profile in the same transaction. A duplicate email surfaces as
/// `UNIQUE_EMAIL` from the index, not from a racy pre-check.
pub async fn register(state: &AppState, input: RegisterInput) -> Result<UserView, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Name cannot be empty",
        ));
    }

    let email = normalize_email(&input.email);
    validate_email(&email)?;
    validate_password(&input.password)?;

    let password_hash = hash_password(&input.password)?;
    let phone = input.phone.clone();
    let resume_url = input.resume_url.clone();

    let user = with_txn(state, |txn| {
        Box::pin(async move {
            let user = users::create_user(
                txn,
                UserCreate::new(name, email, password_hash).with_role(UserRole::Candidate),
            )
            .await?;

            candidates::create_candidate(txn, user.id, phone, resume_url).await?;

            Ok(user)
        })
    })
    .await?;

    info!(
        trace_id = %trace_ctx::trace_id(),
        user_id = %user.id,
        email = %Redacted(&user.email),
        "Registered new candidate account"
    );

    Ok(UserView::from(user))
}

/// Verify credentials and mint a token pair. Unknown email, wrong password,
/// and a deactivated account all produce the identical 401; the distinction
/// lives in the log only.
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(TokenPair, UserView), AppError> {
    let db = require_db(state)?;
    let email = normalize_email(email);
    let trace_id = trace_ctx::trace_id();

    let user = match users::find_by_email(db, &email).await? {
        Some(user) => user,
        None => {
            warn!(trace_id = %trace_id, email = %Redacted(&email), "Login for unknown email");
            return Err(AppError::unauthorized());
        }
    };

    if !user.is_active {
        warn!(trace_id = %trace_id, user_id = %user.id, "Login for deactivated account");
        return Err(AppError::unauthorized());
    }

    if !verify_password(password, &user.password_hash)? {
        warn!(trace_id = %trace_id, user_id = %user.id, "Login with wrong password");
        return Err(AppError::unauthorized());
    }

    let now = SystemTime::now();
    let sub = user.id.to_string();
    let pair = TokenPair {
        access_token: mint_access_token(&sub, &user.email, user.role, now, &state.security)?,
        refresh_token: mint_refresh_token(&sub, now, &state.security)?,
    };

    // Single-slot rotation: the newest login owns the slot. One update so
    // the slot and the login stamp cannot diverge.
    let login_at = time::OffsetDateTime::now_utc();
    users::record_login(db, user.id, &pair.refresh_token, login_at).await?;

    let mut view = UserView::from(user);
    view.last_login = Some(login_at);

    Ok((pair, view))
}

/// Rotate the token pair. The presented token must verify AND match the
/// stored slot; a token left over from before a logout or a newer login is
/// rejected even though its signature is still valid.
pub async fn refresh(state: &AppState, token: &str) -> Result<TokenPair, AppError> {
    let db = require_db(state)?;
    let claims = verify_refresh_token(token, &state.security)?;

    let user_id =
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::invalid_refresh_token())?;

    let user = users::find_by_id(db, user_id)
        .await?
        .ok_or_else(AppError::invalid_refresh_token)?;

    if !user.is_active {
        return Err(AppError::invalid_refresh_token());
    }

    if user.refresh_token.as_deref() != Some(token) {
        warn!(
            trace_id = %trace_ctx::trace_id(),
            user_id = %user.id,
            "Refresh token does not match the stored slot"
        );
        return Err(AppError::invalid_refresh_token());
    }

    let now = SystemTime::now();
    let sub = user.id.to_string();
    let pair = TokenPair {
        access_token: mint_access_token(&sub, &user.email, user.role, now, &state.security)?,
        refresh_token: mint_refresh_token(&sub, now, &state.security)?,
    };

    users::set_refresh_token(db, user.id, Some(pair.refresh_token.clone())).await?;

    Ok(pair)
}

/// Clear the refresh slot; any outstanding refresh token stops working.
pub async fn logout(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    let db = require_db(state)?;
    users::set_refresh_token(db, user_id, None).await?;
    Ok(())
}

/// Mint a reset token when the account exists and is active. The caller must
/// answer the same way either way; the `Option` is for delivery, never for
/// the HTTP response.
pub async fn forgot_password(state: &AppState, email: &str) -> Result<Option<String>, AppError> {
    let db = require_db(state)?;
    let email = normalize_email(email);

    let user = users::find_by_email(db, &email).await?;

    match user {
        Some(user) if user.is_active => {
            let token =
                mint_password_reset_token(&user.id.to_string(), SystemTime::now(), &state.security)?;
            info!(
                trace_id = %trace_ctx::trace_id(),
                user_id = %user.id,
                "Issued password reset token"
            );
            Ok(Some(token))
        }
        _ => {
            info!(
                trace_id = %trace_ctx::trace_id(),
                email = %Redacted(&email),
                "Password reset requested for unknown or inactive account"
            );
            Ok(None)
        }
    }
}

/// Verify the reset token, store the new hash, and clear the refresh slot so
/// stolen sessions die with the old password.
pub async fn reset_password(
    state: &AppState,
    token: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let db = require_db(state)?;
    validate_password(new_password)?;

    let claims = verify_password_reset_token(token, &state.security)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized_invalid_jwt())?;

    let user = users::require_user(db, user_id).await?;
    if !user.is_active {
        return Err(AppError::unauthorized());
    }

    let password_hash = hash_password(new_password)?;
    users::set_password_hash(db, user.id, &password_hash).await?;
    users::set_refresh_token(db, user.id, None).await?;

    info!(trace_id = %trace_ctx::trace_id(), user_id = %user.id, "Password reset completed");
    Ok(())
}

/// Change the password for a logged-in account; the current password must
/// verify first.
pub async fn change_password(
    state: &AppState,
    user_id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let db = require_db(state)?;
    validate_password(new_password)?;

    let user = users::require_user(db, user_id).await?;

    if !verify_password(current_password, &user.password_hash)? {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Current password is incorrect",
        ));
    }

    let password_hash = hash_password(new_password)?;
    users::set_password_hash(db, user.id, &password_hash).await?;

    info!(trace_id = %trace_ctx::trace_id(), user_id = %user.id, "Password changed");
    Ok(())
}

/// Sanitized view of the account.
pub async fn profile(state: &AppState, user_id: Uuid) -> Result<UserView, AppError> {
    let db = require_db(state)?;
    let user = users::require_user(db, user_id).await?;
    Ok(UserView::from(user))
}
