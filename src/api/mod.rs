//! API layer
//!
//! HTTP handlers for:
//! - User API (accounts, relationships, bookmarks, profiles)
//! - Metrics (Prometheus)

mod dto;
pub mod metrics;
mod users;

pub use dto::*;

pub use metrics::metrics_router;
pub use users::users_router;
