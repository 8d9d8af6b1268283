use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedInvalidJwt")]
    UnauthorizedInvalidJwt,
    #[error("UnauthorizedExpiredJwt")]
    UnauthorizedExpiredJwt,
    #[error("InvalidRefreshToken")]
    InvalidRefreshToken,
    #[error("Forbidden")]
    Forbidden,
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Error code as it appears in the HTTP response.
    ///
    /// All access-token failures collapse to `UNAUTHORIZED`: whether the
    /// token was missing, expired, malformed, or pointed at a gone account
    /// is visible in logs only, so the auth path cannot be used to probe
    /// accounts.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Unauthorized
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt => ErrorCode::Unauthorized,
            AppError::InvalidRefreshToken => ErrorCode::InvalidRefreshToken,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Client-visible detail text.
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Unauthorized
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt => "Authentication required".to_string(),
            AppError::InvalidRefreshToken => "Invalid refresh token".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::Db { .. } => "Database error".to_string(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::Config { .. } => "Configuration error".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt
            | AppError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Db { .. }
            | AppError::DbUnavailable
            | AppError::Config { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::UnauthorizedInvalidJwt
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::UnauthorizedExpiredJwt
    }

    pub fn invalid_refresh_token() -> Self {
        Self::InvalidRefreshToken
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => {
                AppError::validation(ErrorCode::ValidationError, detail)
            }
            DomainError::InvalidTransition { event, status } => AppError::conflict(
                ErrorCode::InvalidTransition,
                format!("Cannot {event} an application in status '{status}'"),
            ),
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::DuplicateApplication => ErrorCode::DuplicateApplication,
                    ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    _ => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => ErrorCode::UserNotFound,
                    NotFoundKind::Candidate => ErrorCode::CandidateNotFound,
                    NotFoundKind::Job => ErrorCode::JobNotFound,
                    NotFoundKind::Application => ErrorCode::ApplicationNotFound,
                    _ => ErrorCode::RecordNotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(InfraErrorKind::DbUnavailable, _) => AppError::db_unavailable(),
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        // The precise variant (expired vs malformed token, internal detail)
        // goes to the log, never into the body.
        if status.is_server_error() {
            tracing::error!(trace_id = %trace_id, error = ?self, "request failed");
        } else {
            tracing::warn!(trace_id = %trace_id, error = ?self, "request rejected");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://talenthub.dev/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_share_external_shape() {
        // Expired token, malformed token, and a missing account must be
        // indistinguishable to the client.
        let variants = [
            AppError::unauthorized(),
            AppError::unauthorized_missing_bearer(),
            AppError::unauthorized_invalid_jwt(),
            AppError::unauthorized_expired_jwt(),
        ];
        for e in &variants {
            assert_eq!(e.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(e.code(), ErrorCode::Unauthorized);
            assert_eq!(e.detail(), "Authentication required");
        }
    }

    #[test]
    fn test_invalid_transition_mapping() {
        let err = AppError::from(DomainError::invalid_transition("accept", "pending"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), ErrorCode::InvalidTransition);
        match err {
            AppError::Conflict { detail, .. } => {
                assert!(detail.contains("accept"));
                assert!(detail.contains("pending"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_application_mapping() {
        let err = AppError::from(DomainError::conflict(
            ConflictKind::DuplicateApplication,
            "already applied",
        ));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), ErrorCode::DuplicateApplication);
    }

    #[test]
    fn test_humanize_code() {
        assert_eq!(AppError::humanize_code("INVALID_TRANSITION"), "Invalid Transition");
        assert_eq!(AppError::humanize_code("UNAUTHORIZED"), "Unauthorized");
    }
}
