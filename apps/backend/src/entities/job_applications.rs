use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle status of a job application.
///
/// `Accepted` and `Rejected` are terminal; the legal moves between the other
/// states live in `domain::application`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "reviewing")]
    Reviewing,
    #[sea_orm(string_value = "interview")]
    Interview,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "accepted")]
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "job_id")]
    pub job_id: Uuid,
    #[sea_orm(column_name = "candidate_id")]
    pub candidate_id: Uuid,
    #[sea_orm(column_name = "cover_letter")]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    #[sea_orm(column_name = "applied_at")]
    pub applied_at: OffsetDateTime,
    #[sea_orm(column_name = "reviewed_at")]
    pub reviewed_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "reviewed_by")]
    pub reviewed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub score: Option<i32>,
    #[sea_orm(column_name = "interview_date")]
    pub interview_date: Option<OffsetDateTime>,
    #[sea_orm(column_name = "interview_notes")]
    pub interview_notes: Option<String>,
    #[sea_orm(column_name = "rejection_reason")]
    pub rejection_reason: Option<String>,
    /// Incremented on every status write; concurrent transitions from a stale
    /// read lose the race instead of both succeeding.
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::candidates::Entity",
        from = "Column::CandidateId",
        to = "super::candidates::Column::Id"
    )]
    Candidate,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::candidates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
