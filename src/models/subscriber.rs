use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents the 'subscribers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for the newsletter form.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubscribeRequest {
    #[validate(email(message = "Please enter a valid email address."), length(max = 255))]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeResponse {
    pub status: SubscriptionStatus,
    pub message: String,
}

impl SubscribeResponse {
    pub fn subscribed() -> Self {
        Self {
            status: SubscriptionStatus::Subscribed,
            message: "You've successfully subscribed to our newsletter.".to_string(),
        }
    }

    /// A duplicate email is not a failure from the reader's point of view.
    pub fn already_subscribed() -> Self {
        Self {
            status: SubscriptionStatus::AlreadySubscribed,
            message: "This email is already on our list.".to_string(),
        }
    }
}
