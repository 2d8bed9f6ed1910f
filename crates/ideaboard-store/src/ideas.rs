//! CRUD operations for [`Idea`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{now_timestamp, parse_timestamp, Database};
use crate::error::{not_found, Result, StoreError};
use crate::models::{Idea, IdeaFilter, NewIdea};

/// Idea columns plus author name and aggregate counts, in `row_to_idea` order.
const IDEA_SELECT: &str = "
    SELECT
        i.id, i.title, i.description, i.status, i.progress, i.author_id,
        u.username,
        (SELECT COUNT(*) FROM comments c WHERE c.idea_id = i.id),
        (SELECT COUNT(*) FROM likes l WHERE l.idea_id = i.id),
        i.created_at, i.updated_at
    FROM ideas i
    LEFT JOIN users u ON i.author_id = u.id";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new idea with progress 0. Returns its id.
    pub fn insert_idea(&self, idea: &NewIdea<'_>) -> Result<i64> {
        let (_, now_str) = now_timestamp();

        self.conn().execute(
            "INSERT INTO ideas (title, description, status, progress, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?5)",
            params![idea.title, idea.description, idea.status, idea.author_id, now_str],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single idea, with counts and tags.
    pub fn get_idea(&self, id: i64) -> Result<Idea> {
        let mut idea = self
            .conn()
            .query_row(
                &format!("{IDEA_SELECT} WHERE i.id = ?1"),
                params![id],
                row_to_idea,
            )
            .map_err(not_found)?;

        idea.tags = self.tags_for_idea(id)?;
        Ok(idea)
    }

    /// Whether an idea with this id exists.
    pub fn idea_exists(&self, id: i64) -> Result<bool> {
        let found = self
            .conn()
            .query_row("SELECT 1 FROM ideas WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Current progress of an idea.
    pub fn get_idea_progress(&self, id: i64) -> Result<i64> {
        self.conn()
            .query_row("SELECT progress FROM ideas WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .map_err(not_found)
    }

    /// List ideas, most recently updated first.
    ///
    /// Status and tag filters both run in SQL, so `limit` and `offset`
    /// page over the filtered result.
    pub fn list_ideas(&self, filter: &IdeaFilter) -> Result<Vec<Idea>> {
        let mut stmt = self.conn().prepare(&format!(
            "{IDEA_SELECT}
             WHERE (?1 IS NULL OR i.status = ?1)
               AND (?2 IS NULL OR EXISTS (
                    SELECT 1 FROM idea_tags it
                    INNER JOIN tags t ON t.id = it.tag_id
                    WHERE it.idea_id = i.id AND t.name = ?2))
             ORDER BY i.updated_at DESC, i.id DESC
             LIMIT ?3 OFFSET ?4"
        ))?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter.limit.map(i64::from).unwrap_or(-1);
        let offset = filter.offset.map(i64::from).unwrap_or(0);

        let rows = stmt.query_map(
            params![filter.status, filter.tag, limit, offset],
            row_to_idea,
        )?;

        let mut ideas = Vec::new();
        for row in rows {
            ideas.push(row?);
        }
        for idea in &mut ideas {
            idea.tags = self.tags_for_idea(idea.id)?;
        }
        Ok(ideas)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Set progress (and optionally status), bumping `updated_at`.
    pub fn update_idea_progress(&self, id: i64, progress: i64, status: Option<&str>) -> Result<()> {
        let (_, now_str) = now_timestamp();

        let affected = self.conn().execute(
            "UPDATE ideas
             SET progress = ?1, status = COALESCE(?2, status), updated_at = ?3
             WHERE id = ?4",
            params![progress, status, now_str, id],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a row of [`IDEA_SELECT`] to an [`Idea`] with no tags.
fn row_to_idea(row: &rusqlite::Row<'_>) -> rusqlite::Result<Idea> {
    let created_str: String = row.get(9)?;
    let updated_str: String = row.get(10)?;

    Ok(Idea {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        progress: row.get(4)?,
        author_id: row.get(5)?,
        author_name: row.get(6)?,
        comment_count: row.get(7)?,
        like_count: row.get(8)?,
        tags: Vec::new(),
        created_at: parse_timestamp(9, &created_str)?,
        updated_at: parse_timestamp(10, &updated_str)?,
    })
}
