//! Application lifecycle over the HTTP surface: submission, review pipeline,
//! terminal states, withdrawal, and role/ownership enforcement.

mod support;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use serde_json::{json, Value};
use support::{applications_count, create_test_app, seed_admin, seed_job, test_state};

use backend::adapters::jobs_sea::JobCreate;
use backend::db::require_db;
use backend::entities::jobs::JobStatus;
use backend::repos::{applications as application_repo, jobs as job_repo};

async fn register_and_login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Candidate",
            "email": email,
            "password": "secret-9"
        }))
        .to_request();
    assert_eq!(test::call_service(app, req).await.status().as_u16(), 201);

    login(app, email, "secret-9").await
}

async fn login<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    body["access_token"].as_str().unwrap().to_string()
}

async fn submit<S>(app: &S, token: &str, job_id: &Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/applications")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "job_id": job_id, "cover_letter": "I would love this role." }))
        .to_request();
    test::call_service(app, req).await
}

async fn put_event<S>(
    app: &S,
    token: &str,
    application_id: &str,
    event: &str,
    payload: Value,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::put()
        .uri(&format!("/api/applications/{application_id}/{event}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(payload)
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn full_pipeline_to_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    seed_admin(&state, "admin@example.com", "admin-pass").await?;
    let job = seed_job(&state, "Backend Engineer", JobStatus::Published).await?;
    let job_id = json!(job);

    let candidate = register_and_login(&app, "cand@example.com").await;
    let admin = login(&app, "admin@example.com", "admin-pass").await;

    // Submit
    let resp = submit(&app, &candidate, &job_id).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(applications_count(&state, job).await?, 1);

    // Review with a score
    let resp = put_event(
        &app,
        &admin,
        &id,
        "review",
        json!({ "notes": "solid background", "score": 80 }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "reviewing");
    assert_eq!(body["score"], 80);
    assert!(body["reviewed_at"].is_string());

    // Schedule the interview
    let resp = put_event(
        &app,
        &admin,
        &id,
        "interview",
        json!({ "interview_date": "2026-09-15T14:00:00Z", "notes": "panel round" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "interview");
    assert_eq!(body["interview_notes"], "panel round");

    // Accept
    let resp = put_event(&app, &admin, &id, "accept", json!({})).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "accepted");

    // Accepted is terminal, even reject bounces off it
    let resp = put_event(&app, &admin, &id, "reject", json!({})).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("reject"), "detail was {detail}");
    assert!(detail.contains("accepted"), "detail was {detail}");

    Ok(())
}

#[actix_web::test]
async fn duplicate_submission_is_409() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    let job_id = json!(seed_job(&state, "Data Engineer", JobStatus::Published).await?);
    let candidate = register_and_login(&app, "dup@example.com").await;

    assert_eq!(submit(&app, &candidate, &job_id).await.status().as_u16(), 201);

    let resp = submit(&app, &candidate, &job_id).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "DUPLICATE_APPLICATION");

    Ok(())
}

#[actix_web::test]
async fn submission_requires_published_job() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    let draft_id = json!(seed_job(&state, "Unlisted Role", JobStatus::Draft).await?);
    let candidate = register_and_login(&app, "early@example.com").await;

    let resp = submit(&app, &candidate, &draft_id).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "JOB_NOT_PUBLISHED");

    Ok(())
}

#[actix_web::test]
async fn review_score_is_bounded() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    seed_admin(&state, "admin@example.com", "admin-pass").await?;
    let job_id = json!(seed_job(&state, "QA Engineer", JobStatus::Published).await?);

    let candidate = register_and_login(&app, "scored@example.com").await;
    let admin = login(&app, "admin@example.com", "admin-pass").await;

    let body: Value = test::read_body_json(submit(&app, &candidate, &job_id).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    let resp = put_event(&app, &admin, &id, "review", json!({ "score": 101 })).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_SCORE");

    // Boundary value is fine
    let resp = put_event(&app, &admin, &id, "review", json!({ "score": 100 })).await;
    assert_eq!(resp.status().as_u16(), 200);

    Ok(())
}

#[actix_web::test]
async fn lifecycle_events_are_admin_only() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    let job_id = json!(seed_job(&state, "Designer", JobStatus::Published).await?);
    let candidate = register_and_login(&app, "hopeful@example.com").await;

    let body: Value = test::read_body_json(submit(&app, &candidate, &job_id).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    let resp = put_event(&app, &candidate, &id, "review", json!({ "score": 90 })).await;
    assert_eq!(resp.status().as_u16(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "FORBIDDEN");

    Ok(())
}

#[actix_web::test]
async fn withdraw_is_owner_only_and_decrements_counter(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    let job = seed_job(&state, "SRE", JobStatus::Published).await?;
    let job_id = json!(job);

    let owner = register_and_login(&app, "owner@example.com").await;
    let other = register_and_login(&app, "other@example.com").await;

    let body: Value = test::read_body_json(submit(&app, &owner, &job_id).await).await;
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(applications_count(&state, job).await?, 1);

    // A different candidate cannot withdraw it
    let req = test::TestRequest::delete()
        .uri(&format!("/api/applications/{id}"))
        .insert_header(("Authorization", format!("Bearer {other}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    // The owner can, and the job counter follows
    let req = test::TestRequest::delete()
        .uri(&format!("/api/applications/{id}"))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(applications_count(&state, job).await?, 0);

    // Gone for good
    let req = test::TestRequest::get()
        .uri(&format!("/api/applications/{id}"))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);

    Ok(())
}

#[actix_web::test]
async fn withdraw_is_blocked_past_reviewing() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    seed_admin(&state, "admin@example.com", "admin-pass").await?;
    let job_id = json!(seed_job(&state, "PM", JobStatus::Published).await?);

    let candidate = register_and_login(&app, "committed@example.com").await;
    let admin = login(&app, "admin@example.com", "admin-pass").await;

    let body: Value = test::read_body_json(submit(&app, &candidate, &job_id).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    put_event(&app, &admin, &id, "review", json!({})).await;
    let resp = put_event(
        &app,
        &admin,
        &id,
        "interview",
        json!({ "interview_date": "2026-09-20T10:00:00Z" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/applications/{id}"))
        .insert_header(("Authorization", format!("Bearer {candidate}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");

    Ok(())
}

#[actix_web::test]
async fn listing_and_visibility() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    seed_admin(&state, "admin@example.com", "admin-pass").await?;
    let job_a = json!(seed_job(&state, "Role A", JobStatus::Published).await?);
    let job_b = json!(seed_job(&state, "Role B", JobStatus::Published).await?);

    let mine = register_and_login(&app, "mine@example.com").await;
    let theirs = register_and_login(&app, "theirs@example.com").await;
    let admin = login(&app, "admin@example.com", "admin-pass").await;

    let body: Value = test::read_body_json(submit(&app, &mine, &job_a).await).await;
    let my_id = body["id"].as_str().unwrap().to_string();
    let body: Value = test::read_body_json(submit(&app, &theirs, &job_b).await).await;
    let their_id = body["id"].as_str().unwrap().to_string();

    // /mine only shows the caller's applications
    let req = test::TestRequest::get()
        .uri("/api/applications/mine")
        .insert_header(("Authorization", format!("Bearer {mine}")))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], my_id.as_str());

    // A candidate cannot read someone else's application, admins can
    let req = test::TestRequest::get()
        .uri(&format!("/api/applications/{their_id}"))
        .insert_header(("Authorization", format!("Bearer {mine}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);

    let req = test::TestRequest::get()
        .uri(&format!("/api/applications/{their_id}"))
        .insert_header(("Authorization", format!("Bearer {admin}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    Ok(())
}

#[actix_web::test]
async fn job_description_is_optional() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let db = require_db(&state)?;

    let job = job_repo::create_job(
        db,
        JobCreate::new("Stealth Role").with_status(JobStatus::Published),
    )
    .await?;
    assert_eq!(job.description, None);

    let loaded = job_repo::require_job(db, job.id).await?;
    assert_eq!(loaded.description, None);

    Ok(())
}

#[actix_web::test]
async fn withdrawal_delete_is_serialized_on_lock_version(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    let job_id = json!(seed_job(&state, "Racer", JobStatus::Published).await?);
    let candidate = register_and_login(&app, "racer@example.com").await;

    let body: Value = test::read_body_json(submit(&app, &candidate, &job_id).await).await;
    let id: uuid::Uuid = body["id"].as_str().unwrap().parse()?;

    let db = require_db(&state)?;

    // A delete presenting a stale version loses and leaves the row intact,
    // the same way a stale status update does.
    let err = application_repo::delete_application(db, id, 0)
        .await
        .unwrap_err();
    assert!(err.is_optimistic_lock());
    assert!(application_repo::find_by_id(db, id).await?.is_some());

    // At the current version the delete goes through.
    application_repo::delete_application(db, id, 1).await?;
    assert!(application_repo::find_by_id(db, id).await?.is_none());

    Ok(())
}

#[actix_web::test]
async fn reject_works_from_any_live_state() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let app = create_test_app(state.clone()).await;

    seed_admin(&state, "admin@example.com", "admin-pass").await?;
    let job_id = json!(seed_job(&state, "Analyst", JobStatus::Published).await?);

    let candidate = register_and_login(&app, "direct@example.com").await;
    let admin = login(&app, "admin@example.com", "admin-pass").await;

    let body: Value = test::read_body_json(submit(&app, &candidate, &job_id).await).await;
    let id = body["id"].as_str().unwrap().to_string();

    // Straight from pending, with a reason
    let resp = put_event(
        &app,
        &admin,
        &id,
        "reject",
        json!({ "reason": "position filled internally" }),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_reason"], "position filled internally");

    // Rejected is terminal too
    let resp = put_event(&app, &admin, &id, "review", json!({})).await;
    assert_eq!(resp.status().as_u16(), 409);

    Ok(())
}
