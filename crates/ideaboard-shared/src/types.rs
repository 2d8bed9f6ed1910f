use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ANONYMOUS_NAME;

/// Kinds of entries written to the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    IdeaCreated,
    IdeaUpdated,
    CommentAdded,
    LikeAdded,
    UserRegistered,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::IdeaCreated => "idea_created",
            ActivityKind::IdeaUpdated => "idea_updated",
            ActivityKind::CommentAdded => "comment_added",
            ActivityKind::LikeAdded => "like_added",
            ActivityKind::UserRegistered => "user_registered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idea_created" => Some(ActivityKind::IdeaCreated),
            "idea_updated" => Some(ActivityKind::IdeaUpdated),
            "comment_added" => Some(ActivityKind::CommentAdded),
            "like_added" => Some(ActivityKind::LikeAdded),
            "user_registered" => Some(ActivityKind::UserRegistered),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-line feed text for an activity row.
///
/// Kinds this build does not recognise render as the raw kind string.
pub fn describe_activity(kind: &str, username: Option<&str>, idea_title: Option<&str>) -> String {
    let idea = idea_title.unwrap_or("an idea");
    match ActivityKind::parse(kind) {
        Some(ActivityKind::CommentAdded) => {
            format!("{} commented on {}", username.unwrap_or(ANONYMOUS_NAME), idea)
        }
        Some(ActivityKind::LikeAdded) => {
            format!("{} liked {}", username.unwrap_or("Someone"), idea)
        }
        Some(ActivityKind::IdeaCreated) => {
            format!("{} created new idea {}", username.unwrap_or("Someone"), idea)
        }
        Some(ActivityKind::IdeaUpdated) => {
            format!("{} updated progress on {}", username.unwrap_or("Someone"), idea)
        }
        Some(ActivityKind::UserRegistered) => {
            format!("{} joined the platform", username.unwrap_or("Someone"))
        }
        None => kind.to_string(),
    }
}
