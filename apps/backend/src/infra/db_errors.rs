//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return raw `sea_orm::DbErr`; repos convert them here so the
//! service layer only ever sees `DomainError`. Raw messages are logged
//! through `Redacted` and never leak into error details.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map a unique-violation message to the conflict it represents.
///
/// Covers both backends: SQLite reports "UNIQUE constraint failed:
/// table.column" (listing every column of a composite index), Postgres
/// reports the constraint name from the migration.
fn map_unique_violation(error_msg: &str) -> (ConflictKind, &'static str) {
    if error_msg.contains("users.email") || error_msg.contains("uq_users_email") {
        return (ConflictKind::UniqueEmail, "Email already registered");
    }
    if error_msg.contains("job_applications.job_id")
        || error_msg.contains("uq_job_applications_job_candidate")
    {
        return (
            ConflictKind::DuplicateApplication,
            "You have already applied to this job",
        );
    }
    if error_msg.contains("candidates.user_id") || error_msg.contains("uq_candidates_user") {
        return (
            ConflictKind::Other("UniqueCandidate".into()),
            "Candidate profile already exists for this user",
        );
    }
    (
        ConflictKind::Other("Unique".into()),
        "Unique constraint violation",
    )
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(msg) => {
            let kind = if msg.contains("Application") {
                NotFoundKind::Application
            } else if msg.contains("Candidate") {
                NotFoundKind::Candidate
            } else if msg.contains("Job") {
                NotFoundKind::Job
            } else if msg.contains("User") {
                NotFoundKind::User
            } else {
                NotFoundKind::Other("Record".into())
            };
            return DomainError::not_found(kind, msg.clone());
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("OPTIMISTIC_LOCK:") => {
            if let Some(json_str) = msg.strip_prefix("OPTIMISTIC_LOCK:") {
                #[derive(serde::Deserialize)]
                struct LockInfo {
                    expected: i32,
                    actual: i32,
                }

                if let Ok(info) = serde_json::from_str::<LockInfo>(json_str) {
                    warn!(
                        trace_id = %trace_id,
                        expected = info.expected,
                        actual = info.actual,
                        "Optimistic lock conflict detected"
                    );

                    return DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "Resource was modified concurrently (expected version {}, actual version {}). Please refresh and retry.",
                            info.expected, info.actual
                        ),
                    );
                }
            }

            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Resource was modified by another transaction; please retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        let (kind, detail) = map_unique_violation(&error_msg);
        return DomainError::conflict(kind, detail);
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation("Foreign key constraint violation");
    }

    if error_msg.contains("timeout")
        || error_msg.contains("pool")
        || error_msg.contains("unavailable")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::DbUnavailable, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_duplicate_application_maps_to_conflict() {
        let err = sea_orm::DbErr::Custom(
            "Query Error: UNIQUE constraint failed: job_applications.job_id, job_applications.candidate_id".into(),
        );
        let mapped = map_db_err(err);
        assert_eq!(
            mapped,
            DomainError::conflict(
                ConflictKind::DuplicateApplication,
                "You have already applied to this job"
            )
        );
    }

    #[test]
    fn postgres_email_constraint_maps_to_unique_email() {
        let err = sea_orm::DbErr::Custom(
            "duplicate key value violates unique constraint \"uq_users_email\"".into(),
        );
        let mapped = map_db_err(err);
        assert_eq!(
            mapped,
            DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
        );
    }

    #[test]
    fn optimistic_lock_payload_parses_versions() {
        let err = sea_orm::DbErr::Custom("OPTIMISTIC_LOCK:{\"expected\":3,\"actual\":4}".into());
        let mapped = map_db_err(err);
        assert!(mapped.is_optimistic_lock());
        match mapped {
            DomainError::Conflict(_, detail) => {
                assert!(detail.contains("expected version 3"));
                assert!(detail.contains("actual version 4"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn record_not_found_picks_entity_kind() {
        let err = sea_orm::DbErr::RecordNotFound("Application not found".into());
        assert_eq!(
            map_db_err(err),
            DomainError::not_found(NotFoundKind::Application, "Application not found")
        );
    }
}
