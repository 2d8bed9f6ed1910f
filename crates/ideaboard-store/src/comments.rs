//! CRUD operations for [`Comment`] records.

use rusqlite::params;

use ideaboard_shared::constants::ANONYMOUS_NAME;

use crate::database::{now_timestamp, parse_timestamp, Database};
use crate::error::{not_found, Result};
use crate::models::{Comment, NewComment};

const COMMENT_COLUMNS: &str =
    "id, idea_id, user_id, author_name, content, is_anonymous, created_at";

impl Database {
    /// Insert a comment and return it as stored.
    pub fn insert_comment(&self, comment: &NewComment<'_>) -> Result<Comment> {
        let (now, now_str) = now_timestamp();

        self.conn().execute(
            "INSERT INTO comments (idea_id, user_id, author_name, content, is_anonymous, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.idea_id,
                comment.user_id,
                comment.author_name,
                comment.content,
                comment.is_anonymous,
                now_str,
            ],
        )?;

        Ok(Comment {
            id: self.conn().last_insert_rowid(),
            idea_id: comment.idea_id,
            user_id: comment.user_id,
            author_name: comment.author_name.to_string(),
            display_name: display_name(comment.is_anonymous, comment.author_name),
            content: comment.content.to_string(),
            is_anonymous: comment.is_anonymous,
            created_at: now,
        })
    }

    /// Fetch a single comment by id.
    pub fn get_comment(&self, id: i64) -> Result<Comment> {
        self.conn()
            .query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                params![id],
                row_to_comment,
            )
            .map_err(not_found)
    }

    /// Comments on an idea, newest first.
    pub fn list_comments(&self, idea_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE idea_id = ?1
             ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![idea_id], row_to_comment)?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }
}

/// Anonymous comments always display as "Anonymous".
fn display_name(is_anonymous: bool, author_name: &str) -> String {
    if is_anonymous {
        ANONYMOUS_NAME.to_string()
    } else {
        author_name.to_string()
    }
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    let author_name: String = row.get(3)?;
    let is_anonymous: bool = row.get(5)?;
    let created_str: String = row.get(6)?;

    Ok(Comment {
        id: row.get(0)?,
        idea_id: row.get(1)?,
        user_id: row.get(2)?,
        display_name: display_name(is_anonymous, &author_name),
        author_name,
        content: row.get(4)?,
        is_anonymous,
        created_at: parse_timestamp(6, &created_str)?,
    })
}
