use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    models::post::PostCard,
    store::ContentStore,
    utils::jwt::CurrentUser,
};

/// List posts written by the current user, drafts included.
#[utoipa::path(
    get,
    path = "/api/profile/posts",
    tag = "profile",
    responses(
        (status = 200, description = "The author's posts", body = [PostCard]),
        (status = 401, description = "Sign-in required")
    )
)]
pub async fn list_my_posts(
    State(store): State<Arc<dyn ContentStore>>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = store
        .profile_for_user(user.user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    let posts: Vec<PostCard> = store
        .posts_by_author(profile.id)
        .await?
        .iter()
        .map(PostCard::from)
        .collect();

    Ok(Json(posts))
}
