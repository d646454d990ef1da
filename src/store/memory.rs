use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ContentStore, StoreError};
use crate::models::{
    category::Category,
    post::{NewPost, PostFields, PostQuery, PostRow},
    subscriber::Subscriber,
    user::{NewUser, Profile, User},
};

/// Stored shape of a post; joins are resolved on read like the SQL store.
#[derive(Debug, Clone)]
struct StoredPost {
    id: i64,
    slug: String,
    author_id: i64,
    featured: bool,
    fields: PostFields,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    categories: Vec<Category>,
    posts: Vec<StoredPost>,
    subscribers: Vec<Subscriber>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn join(&self, post: &StoredPost) -> PostRow {
        let category = post
            .fields
            .category_id
            .and_then(|id| self.categories.iter().find(|c| c.id == id));
        let author = self.profiles.iter().find(|p| p.id == post.author_id);

        PostRow {
            id: post.id,
            title: post.fields.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.fields.excerpt.clone(),
            content: post.fields.content.clone(),
            cover_image: post.fields.cover_image.clone(),
            category_id: post.fields.category_id,
            author_id: post.author_id,
            published: post.fields.published,
            featured: post.featured,
            read_time: Some(post.fields.read_time),
            created_at: post.created_at,
            updated_at: post.updated_at,
            category_name: category.map(|c| c.name.clone()),
            category_slug: category.map(|c| c.slug.clone()),
            author_name: author.map(|a| a.display_name.clone()),
            author_bio: author.and_then(|a| a.bio.clone()),
        }
    }
}

/// Newest first; ids break ties between posts created in the same instant.
fn newest_first(mut rows: Vec<PostRow>) -> Vec<PostRow> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

/// In-process store with the same semantics as the SQL schema, including
/// unique usernames, slugs and subscriber emails.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The categories the SQL migration seeds.
const SEED_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Technology", "technology", "Software, hardware and the people building them."),
    ("Lifestyle", "lifestyle", "Habits, health and everyday living."),
    ("Travel", "travel", "Places worth the trip."),
    ("Business", "business", "Companies, strategy and work."),
    ("Design", "design", "Visual and product design."),
];

impl MemoryStore {
    /// Empty store with the default categories.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for (name, slug, description) in SEED_CATEGORIES {
            let id = tables.next_id();
            tables.categories.push(Category {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                description: Some(description.to_string()),
            });
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Marks a post as the home page hero. There is no HTTP surface for this;
    /// editors flip the flag directly in the store.
    pub async fn set_featured(&self, id: i64, featured: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.featured = featured;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn published_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .posts
            .iter()
            .filter(|p| p.fields.published)
            .map(|p| tables.join(p))
            .filter(|row| match &query.category_slug {
                Some(slug) => row.in_category(slug),
                None => true,
            })
            .collect();

        let mut rows = newest_first(rows);
        if let Some(limit) = query.limit {
            rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn has_published_posts(&self) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().any(|p| p.fields.published))
    }

    async fn post_by_id(&self, id: i64) -> Result<Option<PostRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).map(|p| tables.join(p)))
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<PostRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| tables.join(p)))
    }

    async fn posts_by_author(&self, author_id: i64) -> Result<Vec<PostRow>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .map(|p| tables.join(p))
            .collect();
        Ok(newest_first(rows))
    }

    async fn insert_post(&self, post: NewPost) -> Result<PostRow, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(StoreError::UniqueViolation("slug".to_string()));
        }

        let now = Utc::now();
        let stored = StoredPost {
            id: tables.next_id(),
            slug: post.slug,
            author_id: post.author_id,
            featured: false,
            fields: post.fields,
            created_at: now,
            updated_at: now,
        };
        let row = tables.join(&stored);
        tables.posts.push(stored);
        Ok(row)
    }

    async fn replace_post(&self, id: i64, fields: PostFields) -> Result<Option<PostRow>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.posts.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        tables.posts[index].fields = fields;
        tables.posts[index].updated_at = Utc::now();
        Ok(Some(tables.join(&tables.posts[index])))
    }

    async fn categories(&self, limit: Option<i64>) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = limit {
            categories.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(categories)
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<(User, Profile), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }

        let created = User {
            id: tables.next_id(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        let profile = Profile {
            id: tables.next_id(),
            user_id: created.id,
            display_name: user.display_name,
            bio: user.bio,
        };

        tables.users.push(created.clone());
        tables.profiles.push(profile.clone());
        Ok((created, profile))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn profile_for_user(&self, user_id: i64) -> Result<Option<Profile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn insert_subscriber(&self, email: &str) -> Result<Subscriber, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.subscribers.iter().any(|s| s.email == email) {
            return Err(StoreError::UniqueViolation("email".to_string()));
        }

        let subscriber = Subscriber {
            id: tables.next_id(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }
}
