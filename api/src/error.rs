use application::{ApplicationError, ErrorResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as JsonResponse, Response},
};
use thiserror::Error;
use tracing::warn;

/// Everything a handler can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Application(#[from] ApplicationError),
    /// The path looked like a known route but its parameter did not parse, or no route matched.
    #[error("No route matches the request")]
    RouteNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Application(err) => map_application_error(err),
        };
        (status, JsonResponse(ErrorResponse::new(message))).into_response()
    }
}

/// Maps ApplicationError variants to HTTP status codes and the public error message.
fn map_application_error(err: ApplicationError) -> (StatusCode, &'static str) {
    match err {
        ApplicationError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        ApplicationError::BadRequest(msg) => {
            warn!("Rejected request body: {}", msg);
            (StatusCode::BAD_REQUEST, "Bad Request")
        }
        ApplicationError::DomainError(domain_err) => {
            warn!("Domain validation failed: {}", domain_err);
            (StatusCode::BAD_REQUEST, "Bad Request")
        }
        ApplicationError::UserNotFound(_) => (StatusCode::NOT_FOUND, "User not found"),
    }
}
