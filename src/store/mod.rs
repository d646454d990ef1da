//! Row-store boundary.
//!
//! Handlers talk to [`ContentStore`] only. [`PgStore`] is the production
//! backend; [`MemoryStore`] keeps everything in process for tests and for
//! running without a database.

mod memory;
mod postgres;
mod sample;

use std::fmt;

use async_trait::async_trait;

use crate::models::{
    category::Category,
    post::{NewPost, PostFields, PostQuery, PostRow},
    subscriber::Subscriber,
    user::{NewUser, Profile, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sample::{EmptyStateProvider, NoContent, SampleContent};

/// Errors returned by a [`ContentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the subject.
    UniqueViolation(String),
    /// Anything else: connection loss, bad SQL, poisoned state.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation(what) => write!(f, "unique violation: {}", what),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Select/insert/update operations over posts, categories, profiles, users
/// and subscribers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published posts, newest first, optionally filtered by category slug.
    async fn published_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, StoreError>;

    /// Whether at least one published post exists.
    async fn has_published_posts(&self) -> Result<bool, StoreError>;

    /// One post regardless of its published flag.
    async fn post_by_id(&self, id: i64) -> Result<Option<PostRow>, StoreError>;

    /// One post regardless of its published flag.
    async fn post_by_slug(&self, slug: &str) -> Result<Option<PostRow>, StoreError>;

    /// All posts of an author, drafts included, newest first.
    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<PostRow>, StoreError>;

    async fn insert_post(&self, post: NewPost) -> Result<PostRow, StoreError>;

    /// Overwrites the editable fields of a post. `None` if it does not exist.
    async fn replace_post(&self, id: i64, fields: PostFields) -> Result<Option<PostRow>, StoreError>;

    /// Categories ordered by name.
    async fn categories(&self, limit: Option<i64>) -> Result<Vec<Category>, StoreError>;

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError>;

    /// Creates a user and its author profile together.
    /// A taken username is [`StoreError::UniqueViolation`].
    async fn insert_user(&self, user: NewUser) -> Result<(User, Profile), StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn profile_for_user(&self, user_id: i64) -> Result<Option<Profile>, StoreError>;

    /// A known email is [`StoreError::UniqueViolation`].
    async fn insert_subscriber(&self, email: &str) -> Result<Subscriber, StoreError>;
}
