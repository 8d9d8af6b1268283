//! JWT extraction middleware.
//!
//! Guards protected scopes: requires `Authorization: Bearer <token>`,
//! verifies the access token, and stores the claims in request extensions
//! for `CurrentUser` to pick up. Missing, expired, and malformed tokens are
//! logged distinctly but all surface to the client as the same 401. Auth
//! failures are rendered here as the problem+json response rather than
//! bubbling a service-level `Err` out of the middleware chain.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn extract_bearer_from_header(value: Option<&header::HeaderValue>) -> Result<String, AppError> {
    let value = value.ok_or_else(AppError::unauthorized_missing_bearer)?;
    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let token = match extract_bearer_from_header(auth_header.as_ref()) {
            Ok(token) => token,
            Err(err) => return Box::pin(async move { Ok(reject(req, err)) }),
        };

        let app_state = match app_state {
            Some(state) => state,
            None => {
                return Box::pin(async move {
                    Ok(reject(req, AppError::internal("AppState not available")))
                });
            }
        };

        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Claims must land in extensions BEFORE calling the service
                req.extensions_mut().insert(claims);

                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(err) => Box::pin(async move { Ok(reject(req, err)) }),
        }
    }
}

/// Render the failure as its problem+json response instead of returning a
/// service-level `Err`.
fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    req.error_response(err).map_into_right_body()
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::HeaderValue;

    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn extracts_bearer_token() {
        let value = HeaderValue::from_static("Bearer abc.def.ghi");
        let token = extract_bearer_from_header(Some(&value)).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_bearer_from_header(None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn wrong_scheme_is_unauthorized() {
        let value = HeaderValue::from_static("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_from_header(Some(&value)).is_err());
    }

    #[test]
    fn empty_token_is_unauthorized() {
        let value = HeaderValue::from_static("Bearer ");
        assert!(extract_bearer_from_header(Some(&value)).is_err());
    }
}
