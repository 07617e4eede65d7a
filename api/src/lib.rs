use application::{PostRepository, PostService, UserRepository, UserService};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use infrastructure::{InMemoryPostRepository, InMemoryUserRepository};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;

use handlers::{
    create_post_handler, delete_post_handler, health_check, list_users_handler,
    not_found_handler, update_user_handler,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users)),
            post_service: Arc::new(PostService::new(posts)),
        }
    }

    /// State backed by freshly seeded in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::seeded()),
            Arc::new(InMemoryPostRepository::seeded()),
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/users", get(list_users_handler))
        .route("/users/:user_id", put(update_user_handler))
        .route("/posts", post(create_post_handler))
        .route("/posts/:post_id", delete(delete_post_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
