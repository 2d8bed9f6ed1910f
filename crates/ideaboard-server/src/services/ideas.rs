//! Idea service: listing, lookup, creation and progress tracking.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use ideaboard_shared::constants::{DEFAULT_IDEA_STATUS, MAX_PROGRESS, MIN_PROGRESS};
use ideaboard_shared::{ActivityKind, Identity};
use ideaboard_store::{ActivityRefs, Database, Idea, IdeaFilter, NewIdea, ProgressLogEntry};

use super::idea_lookup;
use crate::error::ServerError;

/// Body of `POST /ideas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIdea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `PATCH /ideas/:id/progress`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressUpdate {
    pub progress: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional new stage label.
    #[serde(default)]
    pub status: Option<String>,
}

/// List ideas. Blank `status` or `tag` values mean "no filter".
pub fn list(db: &Database, filter: &IdeaFilter) -> Result<Vec<Idea>, ServerError> {
    let present = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let filter = IdeaFilter {
        status: present(&filter.status),
        tag: present(&filter.tag),
        ..filter.clone()
    };
    Ok(db.list_ideas(&filter)?)
}

pub fn get_by_id(db: &Database, id: i64) -> Result<Idea, ServerError> {
    db.get_idea(id).map_err(idea_lookup)
}

pub fn list_tags(db: &Database) -> Result<Vec<String>, ServerError> {
    Ok(db.list_tag_names()?)
}

/// Create an idea with its tags and log `idea_created`.
///
/// Tags are get-or-created one by one. Two requests introducing the same
/// new tag name race on the `UNIQUE(name)` constraint; the loser's insert
/// is a no-op and both end up linked to the single surviving row.
pub fn create(db: &Database, author: &Identity, input: &CreateIdea) -> Result<Idea, ServerError> {
    let title = input.title.trim();
    let description = input.description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(ServerError::Validation(
            "Title and description are required".into(),
        ));
    }

    let status = input
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_IDEA_STATUS);
    let tags = normalize_tags(&input.tags);

    let idea_id = db.in_transaction(|db| -> Result<i64, ServerError> {
        let idea_id = db.insert_idea(&NewIdea {
            title,
            description,
            status,
            author_id: author.id,
        })?;

        for name in &tags {
            let tag_id = db.get_or_create_tag(name)?;
            db.link_tag(idea_id, tag_id)?;
        }

        db.log_activity(
            ActivityKind::IdeaCreated,
            ActivityRefs {
                user_id: Some(author.id),
                idea_id: Some(idea_id),
                ..Default::default()
            },
            Some(&json!({ "title": title })),
        )?;

        Ok(idea_id)
    })?;

    info!(idea_id, author = %author.username, tags = tags.len(), "idea created");
    get_by_id(db, idea_id)
}

/// Set an idea's progress, record the change and log `idea_updated`.
/// Returns the new progress.
pub fn update_progress(
    db: &Database,
    id: i64,
    update: &ProgressUpdate,
    actor: &Identity,
) -> Result<i64, ServerError> {
    let progress = match update.progress {
        Some(p) if (MIN_PROGRESS..=MAX_PROGRESS).contains(&p) => p,
        _ => {
            return Err(ServerError::Validation(
                "Progress must be between 0 and 100".into(),
            ))
        }
    };
    let status = update
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let notes = update.notes.as_deref();

    let old_progress = db.in_transaction(|db| -> Result<i64, ServerError> {
        let old_progress = db.get_idea_progress(id).map_err(idea_lookup)?;

        db.update_idea_progress(id, progress, status)
            .map_err(idea_lookup)?;
        db.log_progress(id, old_progress, progress, notes, Some(actor.id))?;
        db.log_activity(
            ActivityKind::IdeaUpdated,
            ActivityRefs {
                user_id: Some(actor.id),
                idea_id: Some(id),
                ..Default::default()
            },
            Some(&json!({ "progress": progress, "oldProgress": old_progress })),
        )?;

        Ok(old_progress)
    })?;

    info!(idea_id = id, old_progress, progress, by = %actor.username, "progress updated");
    Ok(progress)
}

/// Progress changes for an idea, newest first.
pub fn progress_history(db: &Database, id: i64) -> Result<Vec<ProgressLogEntry>, ServerError> {
    if !db.idea_exists(id)? {
        return Err(ServerError::idea_not_found());
    }
    Ok(db.progress_history(id)?)
}

/// Trim, drop empties and collapse duplicates, keeping first-seen order.
fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim();
        if !name.is_empty() && !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}
