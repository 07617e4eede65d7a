use crate::{AppState, error::ApiError};
use application::{ApplicationError, HealthResponse};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Json as JsonResponse},
};
use domain::{Post, PostId, User, UserId};
use serde_json::Value;
use tracing::{info, warn};

pub async fn health_check() -> impl IntoResponse {
    info!("Health check endpoint called");
    (StatusCode::OK, JsonResponse(HealthResponse::ok()))
}

/// Handler for listing users (GET /users).
pub async fn list_users_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<JsonResponse<Vec<User>>, ApiError> {
    info!("Received request to list users");
    let authorization = headers
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()));
    let users = state
        .user_service
        .list_users(authorization.as_deref())
        .await?;
    Ok(JsonResponse(users))
}

/// Handler for creating a post (POST /posts).
pub async fn create_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, JsonResponse<Post>), ApiError> {
    info!("Received request to create post");
    let Json(body) = payload.map_err(rejected_body)?;
    let post = state.post_service.create_post(&body).await?;
    Ok((StatusCode::CREATED, JsonResponse(post)))
}

/// Handler for updating a user (PUT /users/:user_id).
pub async fn update_user_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<JsonResponse<User>, ApiError> {
    let user_id = route_id(path)?;
    info!(user_id, "Received request to update user");
    let Json(body) = payload.map_err(rejected_body)?;
    let user = state
        .user_service
        .update_user(UserId::new(user_id), &body)
        .await?;
    Ok(JsonResponse(user))
}

/// Handler for deleting a post (DELETE /posts/:post_id).
pub async fn delete_post_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let post_id = route_id(path)?;
    info!(post_id, "Received request to delete post");
    state.post_service.delete_post(PostId::new(post_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    warn!(path = %uri.path(), "No route matched");
    ApiError::RouteNotFound
}

fn rejected_body(rejection: JsonRejection) -> ApiError {
    ApplicationError::BadRequest(rejection.body_text()).into()
}

/// Id segments are plain decimal digits; anything else means the route does not match.
/// Digit strings too large for a u64 are treated the same way.
fn route_id(path: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let Path(raw) = path.map_err(|rejection| {
        warn!("Path parameter rejected: {}", rejection.body_text());
        ApiError::RouteNotFound
    })?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        warn!(segment = %raw, "Path id is not a decimal integer");
        return Err(ApiError::RouteNotFound);
    }
    raw.parse::<u64>().map_err(|_| {
        warn!(segment = %raw, "Path id out of range");
        ApiError::RouteNotFound
    })
}
