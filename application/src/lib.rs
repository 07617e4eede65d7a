use async_trait::async_trait;
use domain::{DomainError, NewPost, Post, PostId, User, UserId, UserUpdate};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Unauthorized: missing Authorization header")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("Domain validation error: {0}")]
    DomainError(#[from] DomainError), // Propagate domain errors cleanly
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for reading and mutating the user collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns every user, ordered by id.
    async fn list(&self) -> Result<Vec<User>, ApplicationError>;
    /// Retrieves a user by id.
    async fn get(&self, id: UserId) -> Result<Option<User>, ApplicationError>;
    /// Applies a partial update. Returns the updated user, or None if no user has this id.
    async fn update(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Option<User>, ApplicationError>;
}

/// Interface for the ordered post collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Returns every post in insertion order. No route lists posts; this is for inspecting the store.
    async fn list(&self) -> Result<Vec<Post>, ApplicationError>;
    /// Assigns an id and appends the post in a single step.
    async fn create(&self, new_post: NewPost) -> Result<Post, ApplicationError>;
    /// Removes every post with this id. Returns how many were removed.
    async fn delete(&self, id: PostId) -> Result<usize, ApplicationError>;
}

// --- Request/Response Models (Data Transfer Objects - DTOs) ---

/// Body of the health endpoint.
#[derive(Serialize, Debug, PartialEq)]
pub struct HealthResponse {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}

/// Body returned with every failed request.
#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// --- Application Services (Use Cases) ---

/// Service for reading and updating users.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Lists users for any caller that presents a non-empty Authorization value.
    /// The value itself is not inspected.
    #[instrument(skip(self, authorization), fields(authorized = authorization.is_some_and(|v| !v.is_empty())))]
    pub async fn list_users(
        &self,
        authorization: Option<&str>,
    ) -> Result<Vec<User>, ApplicationError> {
        match authorization {
            Some(value) if !value.is_empty() => {}
            _ => {
                warn!("Listing users rejected: no Authorization header");
                return Err(ApplicationError::Unauthorized);
            }
        }
        let users = self.repo.list().await?;
        info!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self, body), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, body: &Value) -> Result<User, ApplicationError> {
        info!("Attempting to update user");

        // An unknown id is reported whatever the body holds
        if self.repo.get(id).await?.is_none() {
            warn!(user_id = %id, "Update failed: user not found");
            return Err(ApplicationError::UserNotFound(id));
        }

        let update = UserUpdate::from_json(body)?;
        debug!(
            name = update.name.is_some(),
            email = update.email.is_some(),
            "Parsed user update"
        );

        self.repo.update(id, update).await?.ok_or_else(|| {
            warn!(user_id = %id, "Update failed: user removed during update");
            ApplicationError::UserNotFound(id)
        })
    }
}

/// Service for creating and deleting posts.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, body))]
    pub async fn create_post(&self, body: &Value) -> Result<Post, ApplicationError> {
        info!("Attempting to create post");
        let new_post = NewPost::from_json(body)?;
        let post = self.repo.create(new_post).await?;
        info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// Deleting an id that is not present is not an error.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn delete_post(&self, id: PostId) -> Result<(), ApplicationError> {
        let removed = self.repo.delete(id).await?;
        if removed == 0 {
            info!("No post matched; nothing deleted");
        } else {
            info!(removed, "Post deleted");
        }
        Ok(())
    }
}
