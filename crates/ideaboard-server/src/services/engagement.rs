//! Engagement service: comments, likes and the activity feed.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use ideaboard_shared::constants::{ANONYMOUS_NAME, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};
use ideaboard_shared::{ActivityKind, Identity};
use ideaboard_store::{ActivityEntry, ActivityRefs, Comment, Database, LikeKey, NewComment};

use crate::error::ServerError;

/// Body of `POST /ideas/:id/comments`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

pub fn list_comments(db: &Database, idea_id: i64) -> Result<Vec<Comment>, ServerError> {
    Ok(db.list_comments(idea_id)?)
}

/// Add a comment and log `comment_added`.
///
/// Without an identity the comment is stored as "Anonymous" with no user
/// reference. A signed-in user asking for anonymity gets "Anonymous" as the
/// stored author name, but the user reference is still recorded.
pub fn add_comment(
    db: &Database,
    idea_id: i64,
    identity: Option<&Identity>,
    request: &NewCommentRequest,
) -> Result<Comment, ServerError> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(ServerError::Validation("Comment content is required".into()));
    }

    let (user_id, author_name) = match identity {
        Some(user) if request.is_anonymous => (Some(user.id), ANONYMOUS_NAME),
        Some(user) => (Some(user.id), user.username.as_str()),
        None => (None, ANONYMOUS_NAME),
    };

    let comment = db.in_transaction(|db| -> Result<Comment, ServerError> {
        if !db.idea_exists(idea_id)? {
            return Err(ServerError::idea_not_found());
        }

        let comment = db.insert_comment(&NewComment {
            idea_id,
            user_id,
            author_name,
            content,
            is_anonymous: request.is_anonymous,
        })?;

        db.log_activity(
            ActivityKind::CommentAdded,
            ActivityRefs {
                user_id,
                idea_id: Some(idea_id),
                comment_id: Some(comment.id),
            },
            Some(&json!({ "isAnonymous": request.is_anonymous })),
        )?;

        Ok(comment)
    })?;

    info!(idea_id, comment_id = comment.id, anonymous = comment.is_anonymous, "comment added");
    Ok(comment)
}

/// Like or unlike an idea.
///
/// The like is keyed on the user id when signed in, otherwise on the
/// requester's address. The whole toggle runs in one immediate transaction,
/// and the insert defers to the one-like-per-key unique index, so a
/// conflicting insert still reports `liked = true`.
pub fn toggle_like(
    db: &Database,
    idea_id: i64,
    identity: Option<&Identity>,
    requester_address: &str,
) -> Result<LikeToggle, ServerError> {
    let key = match identity {
        Some(user) => LikeKey::User(user.id),
        None => LikeKey::Address(requester_address.to_string()),
    };

    let outcome = db.in_transaction(|db| -> Result<LikeToggle, ServerError> {
        if !db.idea_exists(idea_id)? {
            return Err(ServerError::idea_not_found());
        }

        let liked = match db.find_like(idea_id, &key)? {
            Some(like_id) => {
                db.delete_like(like_id)?;
                false
            }
            None => {
                if db.insert_like(idea_id, &key)? {
                    db.log_activity(
                        ActivityKind::LikeAdded,
                        ActivityRefs {
                            user_id: identity.map(|u| u.id),
                            idea_id: Some(idea_id),
                            ..Default::default()
                        },
                        None,
                    )?;
                }
                true
            }
        };

        Ok(LikeToggle {
            liked,
            like_count: db.count_likes(idea_id)?,
        })
    })?;

    debug!(idea_id, ?key, liked = outcome.liked, count = outcome.like_count, "like toggled");
    Ok(outcome)
}

/// Clamp a requested feed size to `1..=MAX_ACTIVITY_LIMIT`; missing,
/// unparseable or zero values give the default.
pub fn activity_limit(raw: Option<&str>) -> u32 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n.min(i64::from(MAX_ACTIVITY_LIMIT)) as u32,
        _ => DEFAULT_ACTIVITY_LIMIT,
    }
}

pub fn recent_activity(db: &Database, limit: u32) -> Result<Vec<ActivityEntry>, ServerError> {
    Ok(db.recent_activity(limit.clamp(1, MAX_ACTIVITY_LIMIT))?)
}
