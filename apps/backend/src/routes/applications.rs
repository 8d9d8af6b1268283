//! Application HTTP routes. The whole scope sits behind JwtExtract; role and
//! ownership checks happen in the service layer.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::job_applications::ApplicationStatus;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::applications::Application;
use crate::services::applications::{
    self, InterviewInput, RejectInput, ReviewInput, SubmitInput,
};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReviewRequest {
    pub notes: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub interview_date: time::OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Wire shape of an application.
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub reviewed_at: Option<time::OffsetDateTime>,
    pub reviewed_by: Option<Uuid>,
    pub notes: Option<String>,
    pub score: Option<i32>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub interview_date: Option<time::OffsetDateTime>,
    pub interview_notes: Option<String>,
    pub rejection_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            job_id: a.job_id,
            candidate_id: a.candidate_id,
            cover_letter: a.cover_letter,
            status: a.status,
            applied_at: a.applied_at,
            reviewed_at: a.reviewed_at,
            reviewed_by: a.reviewed_by,
            notes: a.notes,
            score: a.score,
            interview_date: a.interview_date,
            interview_notes: a.interview_notes,
            rejection_reason: a.rejection_reason,
            updated_at: a.updated_at,
        }
    }
}

async fn submit(
    current_user: CurrentUser,
    req: web::Json<SubmitRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let application = applications::submit(
        &app_state,
        &current_user,
        SubmitInput {
            job_id: req.job_id,
            cover_letter: req.cover_letter,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(ApplicationResponse::from(application)))
}

async fn list_mine(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let applications = applications::list_for_candidate(&app_state, &current_user).await?;
    let body: Vec<ApplicationResponse> = applications
        .into_iter()
        .map(ApplicationResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_one(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let application =
        applications::find_for_identity(&app_state, &current_user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse::from(application)))
}

async fn withdraw(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    applications::withdraw(&app_state, &current_user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn review(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<ReviewRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let application = applications::mark_reviewed(
        &app_state,
        &current_user,
        path.into_inner(),
        ReviewInput {
            notes: req.notes,
            score: req.score,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse::from(application)))
}

async fn interview(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<InterviewRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let application = applications::schedule_interview(
        &app_state,
        &current_user,
        path.into_inner(),
        InterviewInput {
            interview_date: req.interview_date,
            notes: req.notes,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse::from(application)))
}

async fn reject(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    req: web::Json<RejectRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let application = applications::reject(
        &app_state,
        &current_user,
        path.into_inner(),
        RejectInput { reason: req.reason },
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse::from(application)))
}

async fn accept(
    current_user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let application =
        applications::accept(&app_state, &current_user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApplicationResponse::from(application)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(submit)),
    )
    .service(web::resource("/mine").route(web::get().to(list_mine)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_one))
            .route(web::delete().to(withdraw)),
    )
    .service(web::resource("/{id}/review").route(web::put().to(review)))
    .service(web::resource("/{id}/interview").route(web::put().to(interview)))
    .service(web::resource("/{id}/reject").route(web::put().to(reject)))
    .service(web::resource("/{id}/accept").route(web::put().to(accept)));
}
