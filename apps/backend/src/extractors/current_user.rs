//! Authenticated account extractor.
//!
//! Reads the `AccessClaims` placed in request extensions by the JwtExtract
//! middleware and resolves them to a live account. A missing or deactivated
//! account produces the same 401 the client would see for a bad token, so
//! the auth path cannot be used to probe which accounts exist.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::auth::claims::AccessClaims;
use crate::db::require_db;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::repos::users;
use crate::state::app_state::AppState;
use crate::trace_ctx;

/// The authenticated account behind the current request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<AccessClaims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;

            let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
                warn!(trace_id = %trace_ctx::trace_id(), "Access token sub is not a uuid");
                AppError::unauthorized_invalid_jwt()
            })?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;
            let db = require_db(app_state)?;

            let user = users::find_by_id(db, user_id).await?;

            match user {
                Some(user) if user.is_active => Ok(CurrentUser {
                    id: user.id,
                    email: user.email,
                    role: user.role,
                }),
                Some(_) => {
                    warn!(trace_id = %trace_ctx::trace_id(), user_id = %user_id, "Deactivated account presented a valid token");
                    Err(AppError::unauthorized())
                }
                None => {
                    warn!(trace_id = %trace_ctx::trace_id(), user_id = %user_id, "Valid token for a missing account");
                    Err(AppError::unauthorized())
                }
            }
        })
    }
}
