//! Data models
//!
//! Rust structs representing database entities and joined views.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default avatar shown until the user uploads one
pub const DEFAULT_PROFILE_PIC: &str = "/static/default-avatar.jpg";

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account
///
/// The list-valued fields hold raw entity ids in insertion order. No
/// deduplication is applied anywhere: repeated follow or bookmark calls
/// append repeated ids, and removal strips every matching occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 hash of the password, never the plaintext
    pub password: String,
    pub registered_at: DateTime<Utc>,
    pub profile_pic: String,
    pub bio: String,
    pub background_pic: String,
    /// Ids of users this account follows
    pub following: Vec<String>,
    /// Ids of users following this account.
    /// Not written by the follow/unfollow operations; see DESIGN.md.
    pub followers: Vec<String>,
    /// Ids of bookmarked posts
    pub bookmarks: Vec<String>,
}

impl User {
    /// Build a fresh account with default profile fields
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: EntityId::new().0,
            username,
            password: password_hash,
            registered_at: Utc::now(),
            profile_pic: DEFAULT_PROFILE_PIC.to_string(),
            bio: " ".to_string(),
            background_pic: " ".to_string(),
            following: Vec::new(),
            followers: Vec::new(),
            bookmarks: Vec::new(),
        }
    }
}

// =============================================================================
// Post
// =============================================================================

/// A post, referenced by bookmarks
///
/// Posts are owned by a separate component; only the fields the profile
/// aggregator joins against are modeled here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    /// Id of the authoring user
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Joined views
// =============================================================================

/// Compact user projection used when resolving id references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub profile_pic: String,
    pub bio: String,
}

impl ProfileSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            profile_pic: user.profile_pic.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// A bookmarked post joined with its author's summary
///
/// `author` is `None` when the authoring account no longer resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkView {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<ProfileSummary>,
}

/// A user with its id references resolved to summaries
///
/// This is the denormalized read served by the profile endpoint and
/// returned after bookmark mutations. It carries display fields only,
/// not the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedUser {
    pub id: String,
    pub username: String,
    pub registered_at: DateTime<Utc>,
    pub profile_pic: String,
    pub bio: String,
    pub background_pic: String,
    pub following: Vec<ProfileSummary>,
    pub followers: Vec<ProfileSummary>,
    pub bookmarks: Vec<BookmarkView>,
}
