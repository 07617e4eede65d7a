use serde::{Deserialize, Serialize}; // For record (de)serialization
use serde_json::{Map, Value}; // Post titles and raw update bodies are arbitrary JSON
use thiserror::Error; // For domain-specific errors

// --- Domain Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Missing required field '{0}'")]
    MissingField(String),
    #[error("Invalid field value for field '{field}': {reason}")]
    InvalidFieldValue { field: String, reason: String },
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),
}

// --- Identifiers ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Id handed to a newly created post: one past the current number of posts.
    /// Collides with an existing id once a post has been deleted.
    pub fn next_for_count(count: usize) -> Self {
        Self(count as u64 + 1)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Users ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Overwrites the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }
}

/// Partial update of a user. The id is not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Builds an update from a raw JSON body.
    /// Keys other than `name` and `email` are ignored.
    pub fn from_json(body: &Value) -> Result<Self, DomainError> {
        let object = as_object(body)?;
        Ok(Self {
            name: optional_string(object, "name")?,
            email: optional_string(object, "email")?,
        })
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, DomainError> {
    body.as_object()
        .ok_or_else(|| DomainError::NotAnObject(json_kind(body).to_string()))
}

fn optional_string(object: &Map<String, Value>, field: &str) -> Result<Option<String>, DomainError> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DomainError::InvalidFieldValue {
            field: field.to_string(),
            reason: format!("Expected a text string, got {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- Posts ---

/// A post. The title is stored exactly as submitted, whatever its JSON type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: Value,
}

impl Post {
    pub fn new(id: PostId, title: Value) -> Self {
        Self { id, title }
    }
}

/// A post that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: Value,
}

impl NewPost {
    /// Accepts any non-empty JSON object that carries a `title` key.
    pub fn from_json(body: &Value) -> Result<Self, DomainError> {
        let object = as_object(body)?;
        if object.is_empty() {
            return Err(DomainError::MissingField("title".to_string()));
        }
        let title = object
            .get("title")
            .cloned()
            .ok_or_else(|| DomainError::MissingField("title".to_string()))?;
        Ok(Self { title })
    }

    pub fn into_post(self, id: PostId) -> Post {
        Post::new(id, self.title)
    }
}

// --- Seed data ---

/// Users present when the process starts.
pub fn seed_users() -> Vec<User> {
    vec![
        User::new(1, "John Doe", "john@example.com"),
        User::new(2, "Jane Smith", "jane@example.com"),
    ]
}

/// Posts present when the process starts.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post::new(PostId::new(1), Value::String("Old Post".to_string())),
        Post::new(PostId::new(2), Value::String("Another Post".to_string())),
    ]
}
