//! User endpoints
//!
//! Registration, login, relationships, bookmarks, and profile fetches.

use axum::{
    Router,
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{delete, get, patch, post},
};

use super::dto::{
    BookmarkRequest, BookmarkResponse, FollowRequest, LoginRequest, LoginResponse,
    ProfileResponse, RegisterRequest, RegisterResponse, RelationshipResponse,
};
use crate::AppState;
use crate::auth::{CurrentUser, require_auth};
use crate::data::User;
use crate::error::AppError;
use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};

/// Create the user-facing router
///
/// The mutating relationship/bookmark routes and the suggestion feed sit
/// behind the authentication layer; login, registration, and profile
/// fetches are public.
pub fn users_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/followUser", patch(follow_user))
        .route("/unfollowUser/:id", delete(unfollow_user))
        .route("/WhoToFollow", get(who_to_follow))
        .route("/addBookmark", patch(add_bookmark))
        .route("/removeBookmark/:id", delete(remove_bookmark))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/login", post(login))
        .route("/createAccount", post(create_account))
        .merge(protected)
        // Path-param route last so the static routes above win.
        .route("/:id", get(fetch_user))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, token) = state.accounts.login(&req.username, &req.password).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/login", "200"])
        .inc();

    Ok(Json(LoginResponse { user, token }))
}

/// POST /createAccount
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    // Start timing the request
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/createAccount"])
        .start_timer();

    let (username, token) = state
        .accounts
        .register(&req.username, &req.password)
        .await?;

    // Record successful request
    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/createAccount", "200"])
        .inc();

    Ok(Json(RegisterResponse { username, token }))
}

/// PATCH /followUser
pub async fn follow_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(req): Json<FollowRequest>,
) -> Result<Json<RelationshipResponse>, AppError> {
    let target = state
        .relationships
        .follow(&session.user_id, &req.id)
        .await?;

    Ok(Json(RelationshipResponse { data: target }))
}

/// DELETE /unfollowUser/:id
pub async fn unfollow_user(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<RelationshipResponse>, AppError> {
    let target = state.relationships.unfollow(&session.user_id, &id).await?;

    Ok(Json(RelationshipResponse { data: target }))
}

/// GET /WhoToFollow
pub async fn who_to_follow(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<User>>, AppError> {
    let suggestions = state.relationships.who_to_follow(&session.user_id).await?;

    Ok(Json(suggestions))
}

/// PATCH /addBookmark
pub async fn add_bookmark(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(req): Json<BookmarkRequest>,
) -> Result<Json<BookmarkResponse>, AppError> {
    let data = state.bookmarks.add(&session.user_id, &req.id).await?;

    Ok(Json(BookmarkResponse {
        data,
        message: "Added to bookmarks".to_string(),
    }))
}

/// DELETE /removeBookmark/:id
pub async fn remove_bookmark(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<BookmarkResponse>, AppError> {
    let data = state.bookmarks.remove(&session.user_id, &id).await?;

    Ok(Json(BookmarkResponse {
        data,
        message: "Removed from bookmarks".to_string(),
    }))
}

/// GET /:id
///
/// Public aggregated profile view.
pub async fn fetch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let data = state.profiles.fetch(&id).await?;

    Ok(Json(ProfileResponse { data }))
}
