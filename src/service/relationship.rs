//! Relationship service
//!
//! Follow/unfollow mutations on a user's `following` list, plus the
//! who-to-follow suggestion query.
//!
//! Every mutation is a read-modify-write cycle: load the acting user,
//! mutate the list in memory, write the document back whole. There is no
//! concurrency token; two concurrent mutations of the same user race and
//! the later save wins.

use std::sync::Arc;

use crate::data::{Database, User};
use crate::error::AppError;

/// Relationship service
#[derive(Clone)]
pub struct RelationshipService {
    db: Arc<Database>,
}

impl RelationshipService {
    /// Create new relationship service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Follow a user
    ///
    /// Appends the target id to the acting user's `following` list.
    /// No duplicate check and no self-follow check: repeated calls append
    /// repeated ids. The target's `followers` list is not touched.
    ///
    /// # Returns
    /// The target id as confirmation
    pub async fn follow(&self, acting_id: &str, target_id: &str) -> Result<String, AppError> {
        if self.db.get_user(target_id).await?.is_none() {
            return Err(AppError::NotFound("User does not exist".to_string()));
        }

        let mut acting = self
            .db
            .get_user(acting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        acting.following.push(target_id.to_string());
        self.db.save_user(&acting).await?;

        tracing::debug!(acting = %acting_id, target = %target_id, "Follow recorded");
        Ok(target_id.to_string())
    }

    /// Unfollow a user
    ///
    /// Removes every occurrence of the target id from the acting user's
    /// `following` list (set-like removal despite list storage).
    ///
    /// # Errors
    /// Returns `NotFound` if the target is not currently followed
    pub async fn unfollow(&self, acting_id: &str, target_id: &str) -> Result<String, AppError> {
        let mut acting = self
            .db
            .get_user(acting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !acting.following.iter().any(|id| id == target_id) {
            return Err(AppError::NotFound("Follower not found".to_string()));
        }

        acting.following.retain(|id| id != target_id);
        self.db.save_user(&acting).await?;

        tracing::debug!(acting = %acting_id, target = %target_id, "Unfollow recorded");
        Ok(target_id.to_string())
    }

    /// Suggest accounts to follow
    ///
    /// Every user except the acting user and the ids already present in
    /// its `following` list, in the store's natural enumeration order.
    /// Unbounded; no pagination.
    pub async fn who_to_follow(&self, acting_id: &str) -> Result<Vec<User>, AppError> {
        let acting = self
            .db
            .get_user(acting_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let all_users = self.db.list_users().await?;
        let suggestions = all_users
            .into_iter()
            .filter(|u| u.id != acting.id && !acting.following.contains(&u.id))
            .collect();

        Ok(suggestions)
    }
}
