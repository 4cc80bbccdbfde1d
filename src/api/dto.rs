//! API request and response DTOs
//!
//! One typed struct per operation. Wire field names (`_id`, `data`,
//! `message`) match what the frontend consumes.

use serde::{Deserialize, Serialize};

use crate::data::{AggregatedUser, User};

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the full user record plus a fresh token
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub token: String,
}

/// Follow request carrying the target user id
#[derive(Debug, Clone, Deserialize)]
pub struct FollowRequest {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Confirmation payload for follow/unfollow
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipResponse {
    /// The target user id
    pub data: String,
}

/// Bookmark request carrying the post id
#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkRequest {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Bookmark mutation response: the re-joined profile plus a status line
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkResponse {
    pub data: AggregatedUser,
    pub message: String,
}

/// Aggregated profile response
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub data: AggregatedUser,
}
