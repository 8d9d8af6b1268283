//! DTOs for applications_sea adapter.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::job_applications::ApplicationStatus;

/// DTO for submitting a new application.
#[derive(Debug, Clone)]
pub struct ApplicationCreate {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: Option<String>,
}

impl ApplicationCreate {
    pub fn new(job_id: Uuid, candidate_id: Uuid) -> Self {
        Self {
            job_id,
            candidate_id,
            cover_letter: None,
        }
    }

    pub fn with_cover_letter(mut self, cover_letter: impl Into<String>) -> Self {
        self.cover_letter = Some(cover_letter.into());
        self
    }
}

/// Unified DTO for updating application fields with optimistic locking.
///
/// All requested column changes land in a single UPDATE with one version
/// increment. `expected_version` must match the row's current lock_version
/// or the update is rejected.
#[derive(Debug, Clone)]
pub struct ApplicationUpdate {
    pub id: Uuid,
    pub status: Option<ApplicationStatus>,
    pub reviewed_at: Option<OffsetDateTime>,
    pub reviewed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub score: Option<i32>,
    pub interview_date: Option<OffsetDateTime>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub expected_version: i32,
}

impl ApplicationUpdate {
    pub fn new(id: Uuid, expected_version: i32) -> Self {
        Self {
            id,
            status: None,
            reviewed_at: None,
            reviewed_by: None,
            notes: None,
            score: None,
            interview_date: None,
            interview_notes: None,
            rejection_reason: None,
            expected_version,
        }
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn reviewed(mut self, by: Uuid, at: OffsetDateTime) -> Self {
        self.reviewed_by = Some(by);
        self.reviewed_at = Some(at);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_interview(mut self, date: OffsetDateTime) -> Self {
        self.interview_date = Some(date);
        self
    }

    pub fn with_interview_notes(mut self, notes: impl Into<String>) -> Self {
        self.interview_notes = Some(notes.into());
        self
    }

    pub fn with_rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }
}
