use actix_web::{web, HttpResponse};
use migration::count_applied_migrations;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (db_status, db_error, migrations) = match require_db(&app_state) {
        Ok(db) => {
            // Lightweight query to verify the connection is live
            match db
                .query_one(sea_orm::Statement::from_string(
                    db.get_database_backend(),
                    "SELECT 1 as health_check".to_string(),
                ))
                .await
            {
                Ok(_) => {
                    let migrations = match count_applied_migrations(db).await {
                        Ok(count) => format!("{count} applied"),
                        Err(_) => "unknown".to_string(),
                    };
                    ("ok".to_string(), None, migrations)
                }
                Err(e) => (
                    "error".to_string(),
                    Some(e.to_string()),
                    "unknown".to_string(),
                ),
            }
        }
        Err(_) => (
            "not_configured".to_string(),
            None,
            "unknown".to_string(),
        ),
    };

    let overall = if db_status == "ok" { "ok" } else { "degraded" };

    let response = HealthResponse {
        status: overall.to_string(),
        app_version,
        db: db_status,
        db_error,
        migrations,
        time,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(health)));
}
