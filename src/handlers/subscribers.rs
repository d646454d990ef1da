use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::subscriber::{SubscribeRequest, SubscribeResponse},
    store::{ContentStore, StoreError},
};

/// Newsletter sign-up.
///
/// A duplicate email is the one constraint violation with its own outcome:
/// 200 `already_subscribed` instead of an error. Anything else that goes
/// wrong is a generic failure.
#[utoipa::path(
    post,
    path = "/api/subscribers",
    tag = "newsletter",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscribed", body = SubscribeResponse),
        (status = 200, description = "Already subscribed", body = SubscribeResponse),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn subscribe(
    State(store): State<Arc<dyn ContentStore>>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    match store.insert_subscriber(&email).await {
        Ok(_) => Ok((StatusCode::CREATED, Json(SubscribeResponse::subscribed()))),
        Err(StoreError::UniqueViolation(_)) => {
            Ok((StatusCode::OK, Json(SubscribeResponse::already_subscribed())))
        }
        Err(StoreError::Backend(msg)) => {
            tracing::error!("Failed to add subscriber: {}", msg);
            Err(AppError::InternalServerError(msg))
        }
    }
}
