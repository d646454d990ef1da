// src/handlers/posts.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::post::{
        NewPost, PostDetail, PostFields, PostRow, PreviewRequest, PreviewResponse, SavedPost,
        WritePostRequest,
    },
    store::{ContentStore, EmptyStateProvider, StoreError},
    utils::{
        authoring::{estimate_read_time, generate_slug, unique_slug},
        html::ContentSanitizer,
        jwt::{CurrentUser, Session},
    },
};

/// Fresh tokens tried when a generated slug is already taken.
const SLUG_ATTEMPTS: i64 = 3;

/// Published posts are public; drafts only reach their own author.
async fn is_visible(
    store: &dyn ContentStore,
    row: &PostRow,
    session: &Session,
) -> Result<bool, AppError> {
    if row.published {
        return Ok(true);
    }
    let Some(user) = session.user() else {
        return Ok(false);
    };
    let profile = store.profile_for_user(user.user_id).await?;
    Ok(profile.is_some_and(|p| p.id == row.author_id))
}

/// Loads the author profile of the signed-in user.
async fn author_profile_id(store: &dyn ContentStore, user: &CurrentUser) -> Result<i64, AppError> {
    store
        .profile_for_user(user.user_id)
        .await?
        .map(|p| p.id)
        .ok_or(AppError::NotFound(
            "Profile not found. Please try signing in again.".to_string(),
        ))
}

/// Stored bodies must render in full, so nothing above the sanitizer cap is accepted.
fn check_content_size(content: &str, sanitizer: &ContentSanitizer) -> Result<(), AppError> {
    let max = sanitizer.max_input_bytes();
    if content.len() > max {
        return Err(AppError::BadRequest(format!(
            "Content is {} bytes; the limit is {} bytes",
            content.len(),
            max
        )));
    }
    Ok(())
}

/// Validates the form and turns it into storable fields.
async fn prepare_fields(
    store: &dyn ContentStore,
    sanitizer: &ContentSanitizer,
    payload: WritePostRequest,
) -> Result<PostFields, AppError> {
    payload.validate()?;
    check_content_size(&payload.content, sanitizer)?;

    if let Some(category_id) = payload.category_id {
        store
            .category_by_id(category_id)
            .await?
            .ok_or(AppError::BadRequest(format!("Unknown category {}", category_id)))?;
    }

    let read_time = estimate_read_time(&payload.content);
    Ok(payload.into_fields(read_time))
}

/// Sanitizing is CPU bound and runs on the blocking pool, off the async workers.
async fn render_detail(row: PostRow, sanitizer: ContentSanitizer) -> Result<PostDetail, AppError> {
    tokio::task::spawn_blocking(move || PostDetail::render(&row, &sanitizer))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Get a single post by ID, rendered with sanitized content.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post detail", body = PostDetail),
        (status = 404, description = "No such published post")
    )
)]
pub async fn get_post(
    State(store): State<Arc<dyn ContentStore>>,
    State(sanitizer): State<ContentSanitizer>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row = store
        .post_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if !is_visible(store.as_ref(), &row, &session).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(Json(render_detail(row, sanitizer).await?))
}

/// Get a single post by slug. Sample articles resolve here while nothing is published.
#[utoipa::path(
    get,
    path = "/api/posts/by-slug/{slug}",
    tag = "posts",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post detail", body = PostDetail),
        (status = 404, description = "No such published post")
    )
)]
pub async fn get_post_by_slug(
    State(store): State<Arc<dyn ContentStore>>,
    State(empty_state): State<Arc<dyn EmptyStateProvider>>,
    State(sanitizer): State<ContentSanitizer>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let row = match store.post_by_slug(&slug).await? {
        Some(row) => {
            if !is_visible(store.as_ref(), &row, &session).await? {
                return Err(AppError::NotFound("Post not found".to_string()));
            }
            row
        }
        None => {
            let has_live = store.has_published_posts().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to check for published posts: {}", e);
                false
            });
            empty_state
                .post_by_slug(&slug)
                .filter(|_| !has_live)
                .ok_or(AppError::NotFound("Post not found".to_string()))?
        }
    };

    Ok(Json(render_detail(row, sanitizer).await?))
}

/// Create a new post (draft or published).
/// Requires: signed-in author.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = WritePostRequest,
    responses(
        (status = 201, description = "Post saved", body = SavedPost),
        (status = 400, description = "Validation failed or content too large"),
        (status = 401, description = "Sign-in required")
    )
)]
pub async fn create_post(
    State(store): State<Arc<dyn ContentStore>>,
    State(sanitizer): State<ContentSanitizer>,
    user: CurrentUser,
    Json(payload): Json<WritePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author_id = author_profile_id(store.as_ref(), &user).await?;
    let title = payload.title.trim().to_string();
    let fields = prepare_fields(store.as_ref(), &sanitizer, payload).await?;

    let token = Utc::now().timestamp_millis();
    let mut attempt = 0;
    let row = loop {
        let post = NewPost {
            slug: unique_slug(&title, token + attempt),
            author_id,
            fields: fields.clone(),
        };
        match store.insert_post(post).await {
            Ok(row) => break row,
            Err(StoreError::UniqueViolation(_)) if attempt + 1 < SLUG_ATTEMPTS => {
                tracing::debug!("Slug collision for '{}', retrying", title);
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("Failed to create post: {}", e);
                return Err(e.into());
            }
        }
    };

    tracing::info!(
        post_id = row.id,
        author_id,
        published = row.published,
        "Post saved"
    );

    Ok((StatusCode::CREATED, Json(SavedPost::from_row(&row))))
}

/// Replace a post wholesale. The slug is kept so existing links stay valid.
/// Requires: signed-in author of the post.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = WritePostRequest,
    responses(
        (status = 200, description = "Post replaced", body = SavedPost),
        (status = 401, description = "Sign-in required"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "No such post")
    )
)]
pub async fn replace_post(
    State(store): State<Arc<dyn ContentStore>>,
    State(sanitizer): State<ContentSanitizer>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<WritePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author_id = author_profile_id(store.as_ref(), &user).await?;

    let existing = store
        .post_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;
    if existing.author_id != author_id {
        return Err(AppError::Forbidden(
            "You are not the author of this post".to_string(),
        ));
    }

    let fields = prepare_fields(store.as_ref(), &sanitizer, payload).await?;
    let row = store
        .replace_post(id, fields)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    tracing::info!(post_id = row.id, published = row.published, "Post replaced");

    Ok(Json(SavedPost::from_row(&row)))
}

/// Render a draft without storing it.
/// Requires: signed-in author.
#[utoipa::path(
    post,
    path = "/api/posts/preview",
    tag = "posts",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Rendered preview", body = PreviewResponse),
        (status = 401, description = "Sign-in required")
    )
)]
pub async fn preview_post(
    State(sanitizer): State<ContentSanitizer>,
    _user: CurrentUser,
    Json(payload): Json<PreviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_content_size(&payload.content, &sanitizer)?;

    let slug = generate_slug(&payload.title);
    let read_time = estimate_read_time(&payload.content);
    let content_html = tokio::task::spawn_blocking(move || sanitizer.sanitize(&payload.content))
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(PreviewResponse {
        slug,
        read_time,
        content_html,
    }))
}
