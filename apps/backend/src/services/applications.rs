//! Application lifecycle: submission, review pipeline, withdrawal.
//!
//! Every status change goes through the pure transition table in
//! `domain::application` and lands as a single optimistic UPDATE. A lost
//! lock race is retried exactly once with a fresh read so the guard is
//! re-validated against the row the winner left behind.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapters::applications_sea::{ApplicationCreate, ApplicationUpdate};
use crate::auth::policy;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::application::{next_status, ApplicationEvent};
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::repos::{applications, candidates, jobs};
use crate::state::app_state::AppState;
use crate::trace_ctx;

#[derive(Debug, Clone)]
pub struct SubmitInput {
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub notes: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct InterviewInput {
    pub interview_date: time::OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RejectInput {
    pub reason: Option<String>,
}

/// Column changes an event carries besides the status itself.
#[derive(Debug, Clone, Default)]
struct EventChanges {
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<time::OffsetDateTime>,
    notes: Option<String>,
    score: Option<i32>,
    interview_date: Option<time::OffsetDateTime>,
    interview_notes: Option<String>,
    rejection_reason: Option<String>,
}

/// Submit an application for a published job.
///
/// Insert and counter increment share a transaction; the unique
/// `(job_id, candidate_id)` index is what stops concurrent duplicates, so
/// two racing submissions cannot both succeed.
pub async fn submit(
    state: &AppState,
    identity: &CurrentUser,
    input: SubmitInput,
) -> Result<applications::Application, AppError> {
    policy::require_candidate(identity.role)?;

    let user_id = identity.id;
    let application = with_txn(state, |txn| {
        Box::pin(async move {
            let candidate = candidates::require_by_user_id(txn, user_id).await?;
            let job = jobs::require_job(txn, input.job_id).await?;

            if !job.is_published() {
                return Err(AppError::validation(
                    ErrorCode::JobNotPublished,
                    "This job is not accepting applications",
                ));
            }

            // Friendly pre-check; the unique index still catches the race.
            if applications::find_by_job_and_candidate(txn, job.id, candidate.id)
                .await?
                .is_some()
            {
                return Err(AppError::conflict(
                    ErrorCode::DuplicateApplication,
                    "You have already applied to this job",
                ));
            }

            let mut create = ApplicationCreate::new(job.id, candidate.id);
            if let Some(cover_letter) = input.cover_letter {
                create = create.with_cover_letter(cover_letter);
            }
            let application = applications::create_application(txn, create).await?;

            jobs::adjust_applications_count(txn, job.id, 1).await?;

            Ok(application)
        })
    })
    .await?;

    info!(
        trace_id = %trace_ctx::trace_id(),
        application_id = %application.id,
        job_id = %application.job_id,
        "Application submitted"
    );

    Ok(application)
}

/// One guarded status write: load, run the transition table, update with the
/// loaded lock_version.
async fn apply_event_once<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    application_id: Uuid,
    event: ApplicationEvent,
    changes: &EventChanges,
) -> Result<applications::Application, AppError> {
    let application = applications::require_application(conn, application_id).await?;

    let next = match next_status(application.status, event) {
        Ok(Some(next)) => next,
        Ok(None) => {
            // Withdrawals delete the row and go through `withdraw`.
            return Err(AppError::internal("deleting events cannot be applied as updates"));
        }
        Err(e) => return Err(e.into()),
    };

    let mut update =
        ApplicationUpdate::new(application.id, application.lock_version).with_status(next);
    if let (Some(by), Some(at)) = (changes.reviewed_by, changes.reviewed_at) {
        update = update.reviewed(by, at);
    }
    if let Some(notes) = &changes.notes {
        update = update.with_notes(notes.clone());
    }
    if let Some(score) = changes.score {
        update = update.with_score(score);
    }
    if let Some(date) = changes.interview_date {
        update = update.with_interview(date);
    }
    if let Some(notes) = &changes.interview_notes {
        update = update.with_interview_notes(notes.clone());
    }
    if let Some(reason) = &changes.rejection_reason {
        update = update.with_rejection_reason(reason.clone());
    }

    let updated = applications::update_application(conn, update).await?;
    Ok(updated)
}

/// Role-gate the event, apply it, and retry a lost lock race exactly once.
///
/// The retry re-reads the row, so a transition the winner made illegal is
/// caught by the guard instead of being overwritten.
async fn apply_event(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
    event: ApplicationEvent,
    changes: EventChanges,
) -> Result<applications::Application, AppError> {
    policy::authorize(identity.role, &[event.required_role()])?;
    let db = require_db(state)?;

    match apply_event_once(db, application_id, event, &changes).await {
        Err(AppError::Conflict { code: ErrorCode::OptimisticLock, .. }) => {
            warn!(
                trace_id = %trace_ctx::trace_id(),
                application_id = %application_id,
                event = event.name(),
                "Lost optimistic lock race, retrying once"
            );
            apply_event_once(db, application_id, event, &changes).await
        }
        other => other,
    }
}

/// Move to `reviewing`, stamping the reviewer. Notes and a 0-100 score are
/// optional.
pub async fn mark_reviewed(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
    input: ReviewInput,
) -> Result<applications::Application, AppError> {
    if let Some(score) = input.score {
        if !(0..=100).contains(&score) {
            return Err(AppError::validation(
                ErrorCode::InvalidScore,
                "Score must be between 0 and 100",
            ));
        }
    }

    apply_event(
        state,
        identity,
        application_id,
        ApplicationEvent::MarkReviewed,
        EventChanges {
            reviewed_by: Some(identity.id),
            reviewed_at: Some(time::OffsetDateTime::now_utc()),
            notes: input.notes,
            score: input.score,
            ..EventChanges::default()
        },
    )
    .await
}

/// Schedule an interview for a reviewed application.
pub async fn schedule_interview(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
    input: InterviewInput,
) -> Result<applications::Application, AppError> {
    apply_event(
        state,
        identity,
        application_id,
        ApplicationEvent::ScheduleInterview,
        EventChanges {
            interview_date: Some(input.interview_date),
            interview_notes: input.notes,
            ..EventChanges::default()
        },
    )
    .await
}

/// Reject from any live state.
pub async fn reject(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
    input: RejectInput,
) -> Result<applications::Application, AppError> {
    apply_event(
        state,
        identity,
        application_id,
        ApplicationEvent::Reject,
        EventChanges {
            rejection_reason: input.reason,
            ..EventChanges::default()
        },
    )
    .await
}

/// Accept an interviewed application.
pub async fn accept(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
) -> Result<applications::Application, AppError> {
    apply_event(
        state,
        identity,
        application_id,
        ApplicationEvent::Accept,
        EventChanges::default(),
    )
    .await
}

/// Withdraw (delete) an early-stage application. Owner only; the delete and
/// the counter decrement share a transaction, and like every other status
/// change the delete is serialized on `lock_version` with one retry.
pub async fn withdraw(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
) -> Result<(), AppError> {
    policy::require_candidate(identity.role)?;

    match withdraw_once(state, identity, application_id).await {
        Err(AppError::Conflict { code: ErrorCode::OptimisticLock, .. }) => {
            warn!(
                trace_id = %trace_ctx::trace_id(),
                application_id = %application_id,
                "Lost optimistic lock race on withdrawal, retrying once"
            );
            withdraw_once(state, identity, application_id).await
        }
        other => other,
    }
}

/// One guarded withdrawal attempt: load, re-check ownership and the guard,
/// delete at the loaded `lock_version`.
async fn withdraw_once(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
) -> Result<(), AppError> {
    let user_id = identity.id;
    with_txn(state, |txn| {
        Box::pin(async move {
            let candidate = candidates::require_by_user_id(txn, user_id).await?;
            let application = applications::require_application(txn, application_id).await?;

            if application.candidate_id != candidate.id {
                warn!(
                    trace_id = %trace_ctx::trace_id(),
                    application_id = %application.id,
                    "Withdrawal attempted by a non-owner"
                );
                return Err(AppError::forbidden());
            }

            // The guard: only pending|reviewing may be withdrawn.
            match next_status(application.status, ApplicationEvent::Withdraw) {
                Ok(None) => {}
                Ok(Some(_)) => {
                    return Err(AppError::internal("withdraw cannot produce a status"));
                }
                Err(e) => return Err(e.into()),
            }

            applications::delete_application(txn, application.id, application.lock_version)
                .await?;
            jobs::adjust_applications_count(txn, application.job_id, -1).await?;

            info!(
                trace_id = %trace_ctx::trace_id(),
                application_id = %application.id,
                "Application withdrawn"
            );

            Ok(())
        })
    })
    .await
}

/// Read a single application: admins see everything, a candidate only their
/// own.
pub async fn find_for_identity(
    state: &AppState,
    identity: &CurrentUser,
    application_id: Uuid,
) -> Result<applications::Application, AppError> {
    let db = require_db(state)?;
    let application = applications::require_application(db, application_id).await?;

    if identity.role == UserRole::Admin {
        return Ok(application);
    }

    let candidate = candidates::require_by_user_id(db, identity.id).await?;
    if application.candidate_id != candidate.id {
        return Err(AppError::forbidden());
    }

    Ok(application)
}

/// The calling candidate's applications, newest first.
pub async fn list_for_candidate(
    state: &AppState,
    identity: &CurrentUser,
) -> Result<Vec<applications::Application>, AppError> {
    policy::require_candidate(identity.role)?;
    let db = require_db(state)?;

    let candidate = candidates::require_by_user_id(db, identity.id).await?;
    let applications = applications::list_by_candidate(db, candidate.id).await?;
    Ok(applications)
}
