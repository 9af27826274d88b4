use crate::{models::UserId, repositories::SortOrder};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Validate, Deserialize)]
pub struct UserCredentialsRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct CreateChirpRequest {
    #[validate(length(max = 140, message = "Chirp is too long"))]
    pub body: String,
}

/// GET /api/chirps query string
#[derive(Debug, Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: UserId,
}
