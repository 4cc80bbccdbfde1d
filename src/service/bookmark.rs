//! Bookmark service
//!
//! Add/remove mutations on a user's `bookmarks` list. Mutations follow the
//! same read-modify-write pattern as the relationship service, then
//! re-read and re-join the profile before responding.

use std::sync::Arc;

use super::profile::ProfileService;
use crate::data::{AggregatedUser, Database};
use crate::error::AppError;

/// Bookmark service
#[derive(Clone)]
pub struct BookmarkService {
    db: Arc<Database>,
    profiles: ProfileService,
}

impl BookmarkService {
    /// Create new bookmark service
    pub fn new(db: Arc<Database>) -> Self {
        let profiles = ProfileService::new(db.clone());
        Self { db, profiles }
    }

    /// Bookmark a post
    ///
    /// Appends the post id (duplicates permitted), persists, then returns
    /// the freshly joined profile view.
    pub async fn add(&self, acting_id: &str, post_id: &str) -> Result<AggregatedUser, AppError> {
        let mut acting = self
            .db
            .get_user(acting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not Found".to_string()))?;

        acting.bookmarks.push(post_id.to_string());
        self.db.save_user(&acting).await?;

        tracing::debug!(acting = %acting_id, post = %post_id, "Bookmark added");
        self.profiles.fetch(acting_id).await
    }

    /// Remove a bookmarked post
    ///
    /// Strips every occurrence of the post id; removing an id that was
    /// never bookmarked is not an error. Returns the joined profile view.
    pub async fn remove(&self, acting_id: &str, post_id: &str) -> Result<AggregatedUser, AppError> {
        let mut acting = self
            .db
            .get_user(acting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not Found".to_string()))?;

        acting.bookmarks.retain(|id| id != post_id);
        self.db.save_user(&acting).await?;

        tracing::debug!(acting = %acting_id, post = %post_id, "Bookmark removed");
        self.profiles.fetch(acting_id).await
    }
}
