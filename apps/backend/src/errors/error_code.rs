//! Error codes for the recruitment backend API.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses. Add new codes here; never pass ad-hoc strings
//! as error codes.

use core::fmt;

/// Centralized error codes for the backend API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string. Note that
/// every flavor of authentication failure shares the single `Unauthorized`
/// code: expired vs. malformed tokens and missing vs. deactivated accounts
/// are distinguished in logs only, never in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Refresh token rejected (expired, malformed, or superseded by rotation)
    InvalidRefreshToken,
    /// Access denied
    Forbidden,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Score outside the 0-100 range
    InvalidScore,
    /// Job is not open for applications
    JobNotPublished,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Candidate profile not found
    CandidateNotFound,
    /// Job not found
    JobNotFound,
    /// Application not found
    ApplicationNotFound,
    /// Record not found (generic 404 for DB-driven not-found)
    RecordNotFound,

    // Business Logic Conflicts
    /// Unique email constraint
    UniqueEmail,
    /// An application for this (job, candidate) pair already exists
    DuplicateApplication,
    /// Requested lifecycle transition is not legal from the current status
    InvalidTransition,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidScore => "INVALID_SCORE",
            Self::JobNotPublished => "JOB_NOT_PUBLISHED",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CandidateNotFound => "CANDIDATE_NOT_FOUND",
            Self::JobNotFound => "JOB_NOT_FOUND",
            Self::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::DuplicateApplication => "DUPLICATE_APPLICATION",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(ErrorCode::InvalidRefreshToken.as_str(), "INVALID_REFRESH_TOKEN");
        assert_eq!(ErrorCode::DuplicateApplication.as_str(), "DUPLICATE_APPLICATION");
        assert_eq!(ErrorCode::InvalidTransition.as_str(), "INVALID_TRANSITION");
        assert_eq!(ErrorCode::OptimisticLock.as_str(), "OPTIMISTIC_LOCK");
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCode::Forbidden.to_string(), ErrorCode::Forbidden.as_str());
    }
}
