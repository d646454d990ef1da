use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::html::ContentSanitizer;

/// Read time shown when a post has none recorded.
pub const DEFAULT_READ_TIME: i32 = 5;

/// Author name shown when a post has no profile attached.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// A row of the 'posts' table joined with its category and author profile.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,

    /// Raw author HTML. Never sent to readers without sanitizing.
    pub content: String,

    pub cover_image: Option<String>,
    pub category_id: Option<i64>,
    pub author_id: i64,
    pub published: bool,
    pub featured: bool,
    pub read_time: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    // Joined columns
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
}

impl PostRow {
    fn category(&self) -> Option<CategoryRef> {
        match (&self.category_name, &self.category_slug) {
            (Some(name), Some(slug)) => Some(CategoryRef {
                name: name.clone(),
                slug: slug.clone(),
            }),
            _ => None,
        }
    }

    pub fn in_category(&self, slug: &str) -> bool {
        self.category_slug.as_deref() == Some(slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub display_name: String,
    pub bio: Option<String>,
}

/// Listing card for feeds and article grids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub category: Option<CategoryRef>,
    pub author: String,
    pub read_time: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub featured: bool,
    pub published: bool,
}

impl From<&PostRow> for PostCard {
    fn from(row: &PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            slug: row.slug.clone(),
            excerpt: row.excerpt.clone().unwrap_or_default(),
            cover_image: row.cover_image.clone(),
            category: row.category(),
            author: row
                .author_name
                .clone()
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            read_time: row.read_time.unwrap_or(DEFAULT_READ_TIME),
            created_at: row.created_at,
            featured: row.featured,
            published: row.published,
        }
    }
}

/// Article detail as served to readers.
/// `content_html` is the sanitized body; the raw body is never included.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub read_time: i32,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub category: Option<CategoryRef>,
    pub author: Option<AuthorRef>,
    pub content_html: String,
}

impl PostDetail {
    pub fn render(row: &PostRow, sanitizer: &ContentSanitizer) -> Self {
        Self {
            id: row.id,
            title: row.title.clone(),
            slug: row.slug.clone(),
            excerpt: row.excerpt.clone(),
            cover_image: row.cover_image.clone(),
            read_time: row.read_time.unwrap_or(DEFAULT_READ_TIME),
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
            category: row.category(),
            author: row.author_name.as_ref().map(|name| AuthorRef {
                display_name: name.clone(),
                bio: row.author_bio.clone(),
            }),
            content_html: sanitizer.sanitize(&row.content),
        }
    }
}

/// Editable fields of a post. Written wholesale on create and replace.
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<i64>,
    pub published: bool,
    pub read_time: i32,
}

/// Insert payload for the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub slug: String,
    pub author_id: i64,
    pub fields: PostFields,
}

/// DTO for the authoring form (create and full replace).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WritePostRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ), custom(function = validate_not_blank))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Excerpt must be at most 500 chars"))]
    pub excerpt: String,

    /// Raw HTML. Stored verbatim, sanitized on render.
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Empty string means no cover image.
    #[serde(default)]
    #[validate(length(max = 500), custom(function = validate_optional_url))]
    pub cover_image: String,

    pub category_id: Option<i64>,

    #[serde(default)]
    pub published: bool,
}

impl WritePostRequest {
    /// Blank optional inputs are stored as NULL.
    pub fn into_fields(self, read_time: i32) -> PostFields {
        PostFields {
            title: self.title.trim().to_string(),
            excerpt: non_blank(self.excerpt),
            content: self.content,
            cover_image: non_blank(self.cover_image),
            category_id: self.category_id,
            published: self.published,
            read_time,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("Title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts an empty string or an absolute http(s) URL.
fn validate_optional_url(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match Url::parse(value.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")),
    }
}

/// DTO for the authoring preview.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    #[serde(default)]
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub slug: String,
    pub read_time: i32,
    pub content_html: String,
}

/// Result of a create or replace.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedPost {
    pub id: i64,
    pub slug: String,
    pub published: bool,
    pub read_time: i32,
    pub message: String,
}

impl SavedPost {
    pub fn from_row(row: &PostRow) -> Self {
        let message = if row.published { "Published!" } else { "Saved as draft" };
        Self {
            id: row.id,
            slug: row.slug.clone(),
            published: row.published,
            read_time: row.read_time.unwrap_or(DEFAULT_READ_TIME),
            message: message.to_string(),
        }
    }
}

/// Filter for listing published posts.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub category_slug: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for the articles page.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleListParams {
    /// Category slug to filter by.
    pub category: Option<String>,
}

/// Where the rows of a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Live,
    EmptyState,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomeFeed {
    pub source: FeedSource,
    pub featured: Option<PostCard>,
    pub recent: Vec<PostCard>,
    pub categories: Vec<crate::models::category::Category>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleList {
    pub source: FeedSource,
    pub category: Option<String>,
    pub posts: Vec<PostCard>,
    pub categories: Vec<crate::models::category::Category>,
}
