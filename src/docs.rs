// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::handlers::{auth, feed, posts, profile, subscribers};
use crate::models::{
    category::Category,
    post::{
        ArticleList, AuthorRef, CategoryRef, FeedSource, HomeFeed, PostCard, PostDetail,
        PreviewRequest, PreviewResponse, SavedPost, WritePostRequest,
    },
    subscriber::{SubscribeRequest, SubscribeResponse, SubscriptionStatus},
    user::{LoginRequest, Profile, RegisterRequest, RegisteredUser, SessionResponse, TokenResponse},
};

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(title = "The Journal API", description = "Reader feeds, article pages and the authoring flow."),
    paths(
        feed::home,
        feed::list_articles,
        feed::list_categories,
        posts::get_post,
        posts::get_post_by_slug,
        posts::create_post,
        posts::replace_post,
        posts::preview_post,
        profile::list_my_posts,
        subscribers::subscribe,
        auth::register,
        auth::login,
        auth::current_session,
    ),
    components(schemas(
        ArticleList, AuthorRef, Category, CategoryRef, FeedSource, HomeFeed, PostCard,
        PostDetail, PreviewRequest, PreviewResponse, SavedPost, WritePostRequest,
        SubscribeRequest, SubscribeResponse, SubscriptionStatus, LoginRequest, Profile,
        RegisterRequest, RegisteredUser, SessionResponse, TokenResponse,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
