#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use backend::adapters::jobs_sea::JobCreate;
use backend::adapters::users_sea::UserCreate;
use backend::auth::password::hash_password;
use backend::config::db::DbProfile;
use backend::db::require_db;
use backend::entities::jobs::JobStatus;
use backend::entities::users::UserRole;
use backend::infra::state::build_state;
use backend::middleware::request_trace::RequestTrace;
use backend::repos::{jobs, users};
use backend::routes;
use backend::state::app_state::AppState;
use backend::AppError;
use uuid::Uuid;

// Logging is auto-installed for every test binary that pulls in support
#[ctor::ctor]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,backend=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// Fresh state backed by a throwaway in-memory database with the schema
/// migrated.
pub async fn test_state() -> Result<AppState, AppError> {
    build_state().with_db(DbProfile::InMemory).build().await
}

/// Build the test service with the production route tree (JwtExtract
/// included on protected scopes).
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let data = web::Data::new(state);

    test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(data)
            .configure(routes::configure),
    )
    .await
}

/// Insert an admin account directly; self-registration only produces
/// candidates.
pub async fn seed_admin(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Uuid, AppError> {
    let db = require_db(state)?;
    let user = users::create_user(
        db,
        UserCreate::new("Admin", email, hash_password(password)?).with_role(UserRole::Admin),
    )
    .await?;
    Ok(user.id)
}

pub async fn seed_job(state: &AppState, title: &str, status: JobStatus) -> Result<Uuid, AppError> {
    let db = require_db(state)?;
    let job = jobs::create_job(
        db,
        JobCreate::new(title)
            .with_description("A role in the hiring pipeline")
            .with_status(status),
    )
    .await?;
    Ok(job.id)
}

pub async fn applications_count(state: &AppState, job_id: Uuid) -> Result<i32, AppError> {
    let db = require_db(state)?;
    let job = jobs::require_job(db, job_id).await?;
    Ok(job.applications_count)
}
