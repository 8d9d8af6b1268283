use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    IsActive,
    RefreshToken,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Candidates {
    Table,
    Id,
    UserId,
    Phone,
    ResumeUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Jobs {
    Table,
    Id,
    Title,
    Description,
    Location,
    EmploymentType,
    Status,
    ApplicationsCount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum JobApplications {
    Table,
    Id,
    JobId,
    CandidateId,
    CoverLetter,
    Status,
    AppliedAt,
    ReviewedAt,
    ReviewedBy,
    Notes,
    Score,
    InterviewDate,
    InterviewNotes,
    RejectionReason,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    // Roles and statuses are stored as short strings so the same
                    // schema runs on Postgres and the SQLite test backend.
                    .col(ColumnDef::new(Users::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::RefreshToken).text().null())
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // candidates
        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Candidates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Candidates::UserId).uuid().not_null())
                    .col(ColumnDef::new(Candidates::Phone).string().null())
                    .col(ColumnDef::new(Candidates::ResumeUrl).string().null())
                    .col(
                        ColumnDef::new(Candidates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Candidates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidates_user")
                            .from(Candidates::Table, Candidates::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_candidates_user")
                    .table(Candidates::Table)
                    .col(Candidates::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // jobs
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::Description).text().null())
                    .col(ColumnDef::new(Jobs::Location).string().null())
                    .col(ColumnDef::new(Jobs::EmploymentType).string().null())
                    .col(ColumnDef::new(Jobs::Status).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Jobs::ApplicationsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Jobs::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        // job_applications
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobApplications::JobId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::CandidateId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::CoverLetter).text().null())
                    .col(
                        ColumnDef::new(JobApplications::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(JobApplications::ReviewedBy).uuid().null())
                    .col(ColumnDef::new(JobApplications::Notes).text().null())
                    .col(ColumnDef::new(JobApplications::Score).integer().null())
                    .col(
                        ColumnDef::new(JobApplications::InterviewDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(JobApplications::InterviewNotes).text().null())
                    .col(ColumnDef::new(JobApplications::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(JobApplications::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_job")
                            .from(JobApplications::Table, JobApplications::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_candidate")
                            .from(JobApplications::Table, JobApplications::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per (job, candidate); duplicate submissions must
        // fail at the storage layer, not only in pre-checks.
        manager
            .create_index(
                Index::create()
                    .name("uq_job_applications_job_candidate")
                    .table(JobApplications::Table)
                    .col(JobApplications::JobId)
                    .col(JobApplications::CandidateId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_status")
                    .table(JobApplications::Table)
                    .col(JobApplications::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Candidates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
