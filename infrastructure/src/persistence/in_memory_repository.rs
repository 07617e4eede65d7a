// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, PostRepository, UserRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use domain::{NewPost, Post, PostId, User, UserId, UserUpdate};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

// --- User Repository Implementation ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    // User ID -> User
    users: Arc<DashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
        }
    }

    /// Repository pre-populated with the startup users.
    pub fn seeded() -> Self {
        Self::with_users(domain::seed_users())
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for user in users {
            repo.users.insert(user.id, user);
        }
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, ApplicationError> {
        debug!("Listing all users from in-memory store");
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn get(&self, id: UserId) -> Result<Option<User>, ApplicationError> {
        debug!("Getting user from in-memory store");
        Ok(self.users.get(&id).map(|user_ref| user_ref.value().clone()))
    }

    #[instrument(skip(self, update), fields(user_id = %id))]
    async fn update(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Option<User>, ApplicationError> {
        debug!("Updating user in in-memory store");
        // get_mut holds the shard lock for the whole merge
        let updated = self.users.get_mut(&id).map(|mut user| {
            user.apply(update);
            user.clone()
        });
        Ok(updated)
    }
}

// --- Post Repository Implementation ---

#[derive(Debug, Clone, Default)]
pub struct InMemoryPostRepository {
    // Insertion-ordered; ids may repeat after a delete followed by a create
    posts: Arc<RwLock<Vec<Post>>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Repository pre-populated with the startup posts.
    pub fn seeded() -> Self {
        Self::with_posts(domain::seed_posts())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(posts)),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Post>, ApplicationError> {
        debug!("Listing all posts from in-memory store");
        Ok(self.posts.read().await.clone())
    }

    #[instrument(skip(self, new_post))]
    async fn create(&self, new_post: NewPost) -> Result<Post, ApplicationError> {
        let mut posts = self.posts.write().await;
        let post = new_post.into_post(PostId::next_for_count(posts.len()));
        debug!(post_id = %post.id, "Appending post to in-memory store");
        posts.push(post.clone());
        Ok(post)
    }

    #[instrument(skip(self), fields(post_id = %id))]
    async fn delete(&self, id: PostId) -> Result<usize, ApplicationError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        let removed = before - posts.len();
        debug!(removed, "Deleted posts from in-memory store");
        Ok(removed)
    }
}
