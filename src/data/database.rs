//! SQLite database operations
//!
//! All database access goes through this module. User documents keep their
//! list-valued fields (`following`, `followers`, `bookmarks`) as JSON array
//! columns that are decoded on read and written back whole on save, so every
//! mutation is a read-modify-write cycle with last-writer-wins semantics.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use std::path::Path;

use super::models::{Post, User};
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

fn decode_id_list(column: &str, raw: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid {column} column: {e}")))
}

fn encode_id_list(ids: &[String]) -> Result<String, AppError> {
    serde_json::to_string(ids).map_err(|e| AppError::Internal(e.into()))
}

fn user_from_row(row: &SqliteRow) -> Result<User, AppError> {
    let following: String = row.get("following");
    let followers: String = row.get("followers");
    let bookmarks: String = row.get("bookmarks");

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        password: row.get("password"),
        registered_at: row.get::<DateTime<Utc>, _>("registered_at"),
        profile_pic: row.get("profile_pic"),
        bio: row.get("bio"),
        background_pic: row.get("background_pic"),
        following: decode_id_list("following", &following)?,
        followers: decode_id_list("followers", &followers)?,
        bookmarks: decode_id_list("bookmarks", &bookmarks)?,
    })
}

impl Database {
    /// Connect to the SQLite database and run migrations
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        // Create connection string
        let connection_string = format!("sqlite:{}?mode=rwc", path.display());

        // Create connection pool
        let pool = SqlitePool::connect(&connection_string).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a user by id
    ///
    /// # Returns
    /// The user or None if absent
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let db_timer = crate::metrics::DB_QUERY_DURATION_SECONDS
            .with_label_values(&["SELECT", "users"])
            .start_timer();

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        crate::metrics::DB_QUERIES_TOTAL
            .with_label_values(&["SELECT", "users"])
            .inc();
        db_timer.observe_duration();

        row.as_ref().map(user_from_row).transpose()
    }

    /// Look up a user by username
    ///
    /// If the registration race ever produced duplicate usernames, the
    /// first row in natural order wins, as it did in the original store.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ? LIMIT 1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Enumerate all users in the store's natural order
    ///
    /// Unbounded; no pagination.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT * FROM users")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// Count users.
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a newly registered user
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password, registered_at, profile_pic, bio,
                background_pic, following, followers, bookmarks
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.registered_at)
        .bind(&user.profile_pic)
        .bind(&user.bio)
        .bind(&user.background_pic)
        .bind(encode_id_list(&user.following)?)
        .bind(encode_id_list(&user.followers)?)
        .bind(encode_id_list(&user.bookmarks)?)
        .execute(&self.pool)
        .await?;

        crate::metrics::DB_QUERIES_TOTAL
            .with_label_values(&["INSERT", "users"])
            .inc();

        Ok(())
    }

    /// Write a mutated user document back to the store
    ///
    /// Blind whole-document overwrite: concurrent saves of the same user
    /// race and the later write wins.
    ///
    /// # Returns
    /// `true` if a row was updated, `false` if the user no longer exists.
    pub async fn save_user(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = ?, password = ?, registered_at = ?, profile_pic = ?,
                bio = ?, background_pic = ?, following = ?, followers = ?,
                bookmarks = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.registered_at)
        .bind(&user.profile_pic)
        .bind(&user.bio)
        .bind(&user.background_pic)
        .bind(encode_id_list(&user.following)?)
        .bind(encode_id_list(&user.followers)?)
        .bind(encode_id_list(&user.bookmarks)?)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Look up a post by id
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Insert a post
    ///
    /// Posts are authored by a separate component; this exists for seeding
    /// the aggregator joins (tests and fixtures).
    pub async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query("INSERT INTO posts (id, author, content, created_at) VALUES (?, ?, ?, ?)")
            .bind(&post.id)
            .bind(&post.author)
            .bind(&post.content)
            .bind(post.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
