//! Domain model structs persisted in the SQLite database.
//!
//! Read models derive `Serialize` so the HTTP layer can hand them straight
//! to `axum::Json`. Field names are snake_case on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Raw role label; see `ideaboard_shared::roles`.
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a [`User`].
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

/// An idea together with its aggregate counts and tag names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Idea {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Free-form stage label (ideation, prototype, development, ...).
    pub status: String,
    /// 0..=100
    pub progress: i64,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub comment_count: i64,
    pub like_count: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert an [`Idea`].
#[derive(Debug, Clone)]
pub struct NewIdea<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub author_id: i64,
}

/// Store-side filter for [`crate::Database::list_ideas`].
///
/// Both filters are applied in SQL, so `limit`/`offset` page over the
/// filtered set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaFilter {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment on an idea.
///
/// Anonymity is a display convention: `user_id` is still recorded when a
/// signed-in user comments anonymously, but it is never serialized and
/// `display_name` reads "Anonymous".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub idea_id: i64,
    #[serde(skip_serializing, default)]
    pub user_id: Option<i64>,
    pub author_name: String,
    pub display_name: String,
    pub content: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a [`Comment`].
#[derive(Debug, Clone)]
pub struct NewComment<'a> {
    pub idea_id: i64,
    pub user_id: Option<i64>,
    pub author_name: &'a str,
    pub content: &'a str,
    pub is_anonymous: bool,
}

// ---------------------------------------------------------------------------
// Like
// ---------------------------------------------------------------------------

/// The identity a like is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LikeKey {
    /// An authenticated user.
    User(i64),
    /// An anonymous requester, by network address.
    Address(String),
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// An activity-log row joined with the names it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: i64,
    /// Raw kind label; unknown labels are passed through untouched.
    pub activity_type: String,
    pub user_id: Option<i64>,
    pub idea_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub metadata: Option<serde_json::Value>,
    pub username: Option<String>,
    pub idea_title: Option<String>,
    pub comment_content: Option<String>,
    /// Rendered feed line.
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Progress log
// ---------------------------------------------------------------------------

/// One recorded progress change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressLogEntry {
    pub id: i64,
    pub idea_id: i64,
    pub old_progress: i64,
    pub new_progress: i64,
    pub notes: Option<String>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
