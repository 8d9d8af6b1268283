//! Account HTTP routes.

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::middleware::jwt_extract::JwtExtract;
use crate::services::auth::{self, RegisterInput, TokenPair, UserView};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserView,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn register(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let user = auth::register(
        &app_state,
        RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            resume_url: req.resume_url,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(user))
}

async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (pair, user) = auth::login(&app_state, &req.email, &req.password).await?;

    let TokenPair {
        access_token,
        refresh_token,
    } = pair;
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user,
    }))
}

async fn refresh(
    req: web::Json<RefreshRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let pair = auth::refresh(&app_state, &req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(pair))
}

/// Always the same response whether or not the account exists; the token
/// (when minted) goes out through the delivery channel, never this body.
async fn forgot_password(
    req: web::Json<ForgotPasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let _token = auth::forgot_password(&app_state, &req.email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "If that email is registered, a reset link has been sent",
    }))
}

async fn reset_password(
    req: web::Json<ResetPasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::reset_password(&app_state, &req.token, &req.new_password).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password has been reset",
    }))
}

async fn me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = auth::profile(&app_state, current_user.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn logout(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::logout(&app_state, current_user.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out",
    }))
}

async fn change_password(
    current_user: CurrentUser,
    req: web::Json<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth::change_password(
        &app_state,
        current_user.id,
        &req.current_password,
        &req.new_password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed",
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/refresh").route(web::post().to(refresh)))
        .service(web::resource("/forgot-password").route(web::post().to(forgot_password)))
        .service(web::resource("/reset-password").route(web::post().to(reset_password)))
        .service(
            web::scope("")
                .wrap(JwtExtract)
                .service(web::resource("/me").route(web::get().to(me)))
                .service(web::resource("/logout").route(web::post().to(logout)))
                .service(
                    web::resource("/change-password").route(web::post().to(change_password)),
                ),
        );
}
