// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    docs,
    handlers::{auth, feed, posts, profile, subscribers},
    state::AppState,
};

/// Largest accepted request body (article bodies included).
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Merges all sub-routers (feed, posts, profile, newsletter, auth).
/// * Applies global middleware (Trace, CORS, body limit).
/// * Injects global state (store, providers, config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/session", get(auth::current_session));

    // Reading is public; writing needs a `CurrentUser`, which rejects
    // anonymous sessions with the sign-in redirect.
    let post_routes = Router::new()
        .route("/", post(posts::create_post))
        .route("/preview", post(posts::preview_post))
        .route("/by-slug/{slug}", get(posts::get_post_by_slug))
        .route("/{id}", get(posts::get_post).put(posts::replace_post));

    Router::new()
        .route("/api/home", get(feed::home))
        .route("/api/articles", get(feed::list_articles))
        .route("/api/categories", get(feed::list_categories))
        .route("/api/subscribers", post(subscribers::subscribe))
        .route("/api/profile/posts", get(profile::list_my_posts))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/posts", post_routes)
        .nest("/api/auth", auth_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
