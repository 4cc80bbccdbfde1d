//! Roost - A lightweight social-networking backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Account, relationship, bookmark, profile endpoints       │
//! │  - Metrics endpoint                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Credential issuance/verification                         │
//! │  - Relationship and bookmark mutations                      │
//! │  - Profile aggregation                                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the user API
//! - `service`: Business logic layer
//! - `data`: Database layer
//! - `auth`: Password hashing, bearer tokens, auth middleware
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

use service::{AccountService, BookmarkService, ProfileService, RelationshipService};

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool and the services.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Credential service (registration, login)
    pub accounts: AccountService,

    /// Relationship service (follow/unfollow)
    pub relationships: RelationshipService,

    /// Bookmark service
    pub bookmarks: BookmarkService,

    /// Profile aggregation service
    pub profiles: ProfileService,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Wire up the services
    /// 3. Seed the user gauge
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = Arc::new(data::Database::connect(&config.database.path).await?);
        tracing::info!("Database connected");

        // 2. Wire up the services
        let config = Arc::new(config);
        let accounts = AccountService::new(db.clone(), config.clone());
        let relationships = RelationshipService::new(db.clone());
        let bookmarks = BookmarkService::new(db.clone());
        let profiles = ProfileService::new(db.clone());

        // 3. Seed the user gauge
        metrics::USERS_TOTAL.set(db.count_users().await?);

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config,
            db,
            accounts,
            relationships,
            bookmarks,
            profiles,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{
        compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer,
    };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::users_router(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(api::metrics_router())
}

async fn health_check() -> &'static str {
    "OK"
}
