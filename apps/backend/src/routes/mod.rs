use actix_web::web;

pub mod applications;
pub mod auth;
pub mod health;

use crate::middleware::jwt_extract::JwtExtract;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// `main.rs` wires the same tree; protected scopes carry the JwtExtract
/// middleware here so tests exercise the real auth path.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Application routes: /api/applications/** (all protected)
    cfg.service(
        web::scope("/api/applications")
            .wrap(JwtExtract)
            .configure(applications::configure_routes),
    );
}
