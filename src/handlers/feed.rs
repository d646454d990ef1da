// src/handlers/feed.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        category::CategoryListParams,
        post::{ArticleList, ArticleListParams, FeedSource, HomeFeed, PostCard, PostQuery, PostRow},
    },
    store::{ContentStore, EmptyStateProvider, StoreError},
};

/// Newest published posts considered for the home page.
pub const HOME_POST_LIMIT: i64 = 7;
/// Cards under the hero on the home page.
pub const HOME_RECENT_LIMIT: usize = 6;
/// Category badges on the home page.
pub const HOME_CATEGORY_LIMIT: i64 = 5;

/// Listing reads never fail the request: a store error is logged and the
/// listing is treated as empty.
fn or_empty<T>(result: Result<Vec<T>, StoreError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load {}: {}", what, e);
        Vec::new()
    })
}

/// Picks live rows, or the empty-state rows when there are none.
fn with_fallback(
    live: Vec<PostRow>,
    has_live: bool,
    empty_state: &dyn EmptyStateProvider,
    category: Option<&str>,
) -> (FeedSource, Vec<PostRow>) {
    if has_live {
        return (FeedSource::Live, live);
    }

    let rows = empty_state
        .posts()
        .into_iter()
        .filter(|row| category.is_none_or(|slug| row.in_category(slug)))
        .collect();
    (FeedSource::EmptyState, rows)
}

/// Home page: one featured post, recent cards and a few categories.
#[utoipa::path(
    get,
    path = "/api/home",
    tag = "feed",
    responses((status = 200, description = "Home feed", body = HomeFeed))
)]
pub async fn home(
    State(store): State<Arc<dyn ContentStore>>,
    State(empty_state): State<Arc<dyn EmptyStateProvider>>,
) -> Result<impl IntoResponse, AppError> {
    let query = PostQuery {
        category_slug: None,
        limit: Some(HOME_POST_LIMIT),
    };
    let live = or_empty(store.published_posts(&query).await, "home feed");
    let has_live = !live.is_empty();
    let (source, rows) = with_fallback(live, has_live, empty_state.as_ref(), None);

    let featured = rows.iter().find(|row| row.featured).map(PostCard::from);
    let recent = rows
        .iter()
        .filter(|row| !row.featured)
        .take(HOME_RECENT_LIMIT)
        .map(PostCard::from)
        .collect();

    let categories = or_empty(
        store.categories(Some(HOME_CATEGORY_LIMIT)).await,
        "home categories",
    );

    Ok(Json(HomeFeed {
        source,
        featured,
        recent,
        categories,
    }))
}

/// Articles page: every published post, optionally for one category.
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "feed",
    params(ArticleListParams),
    responses((status = 200, description = "Published articles", body = ArticleList))
)]
pub async fn list_articles(
    State(store): State<Arc<dyn ContentStore>>,
    State(empty_state): State<Arc<dyn EmptyStateProvider>>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = params.category.filter(|slug| !slug.trim().is_empty());
    let query = PostQuery {
        category_slug: category.clone(),
        limit: None,
    };
    let live = or_empty(store.published_posts(&query).await, "articles");

    // An empty category page is still a live page as long as anything is published.
    let has_live = if live.is_empty() {
        store.has_published_posts().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to check for published posts: {}", e);
            false
        })
    } else {
        true
    };

    let (source, rows) = with_fallback(live, has_live, empty_state.as_ref(), category.as_deref());
    let categories = or_empty(store.categories(None).await, "categories");

    Ok(Json(ArticleList {
        source,
        category,
        posts: rows.iter().map(PostCard::from).collect(),
        categories,
    }))
}

/// Lists categories by name.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "feed",
    params(CategoryListParams),
    responses((status = 200, description = "Categories", body = [crate::models::category::Category]))
)]
pub async fn list_categories(
    State(store): State<Arc<dyn ContentStore>>,
    Query(params): Query<CategoryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.map(|l| l.clamp(1, 100));
    let categories = or_empty(store.categories(limit).await, "categories");
    Ok(Json(categories))
}
