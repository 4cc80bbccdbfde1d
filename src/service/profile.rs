//! Profile aggregation service
//!
//! Assembles the denormalized view of a user: id references in the
//! `following`/`followers`/`bookmarks` lists are resolved to summaries at
//! read time, one lookup per id. Each lookup sees the store as of its own
//! call; there is no isolation across the nested joins.

use std::sync::Arc;

use crate::data::{AggregatedUser, BookmarkView, Database, ProfileSummary};
use crate::error::AppError;

/// Profile aggregation service
#[derive(Clone)]
pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    /// Create new profile service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Fetch the aggregated view of a user
    ///
    /// # Errors
    /// Returns `NotFound` if the user is absent
    pub async fn fetch(&self, user_id: &str) -> Result<AggregatedUser, AppError> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        let following = self.resolve_summaries(&user.following).await?;
        let followers = self.resolve_summaries(&user.followers).await?;
        let bookmarks = self.resolve_bookmarks(&user.bookmarks).await?;

        Ok(AggregatedUser {
            id: user.id,
            username: user.username,
            registered_at: user.registered_at,
            profile_pic: user.profile_pic,
            bio: user.bio,
            background_pic: user.background_pic,
            following,
            followers,
            bookmarks,
        })
    }

    /// Resolve user ids to profile summaries, dropping ids that no
    /// longer resolve.
    async fn resolve_summaries(&self, ids: &[String]) -> Result<Vec<ProfileSummary>, AppError> {
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = self.db.get_user(id).await? {
                summaries.push(ProfileSummary::from_user(&user));
            }
        }
        Ok(summaries)
    }

    /// Resolve bookmarked post ids to posts joined with their author's
    /// summary. A missing post is dropped; a post whose author is gone is
    /// kept with `author: None`.
    async fn resolve_bookmarks(&self, ids: &[String]) -> Result<Vec<BookmarkView>, AppError> {
        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(post) = self.db.get_post(id).await? else {
                continue;
            };
            let author = self
                .db
                .get_user(&post.author)
                .await?
                .map(|user| ProfileSummary::from_user(&user));
            views.push(BookmarkView {
                id: post.id,
                content: post.content,
                created_at: post.created_at,
                author,
            });
        }
        Ok(views)
    }
}
