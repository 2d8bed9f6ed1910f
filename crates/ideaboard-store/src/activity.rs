//! Append-only activity log and the feed query over it.

use rusqlite::params;

use ideaboard_shared::types::{describe_activity, ActivityKind};

use crate::database::{now_timestamp, parse_timestamp, Database};
use crate::error::Result;
use crate::models::ActivityEntry;

/// References an activity row may carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityRefs {
    pub user_id: Option<i64>,
    pub idea_id: Option<i64>,
    pub comment_id: Option<i64>,
}

impl Database {
    /// Append an activity row. Returns its id.
    pub fn log_activity(
        &self,
        kind: ActivityKind,
        refs: ActivityRefs,
        metadata: Option<&serde_json::Value>,
    ) -> Result<i64> {
        let (_, now_str) = now_timestamp();
        let metadata = metadata.map(serde_json::to_string).transpose()?;

        self.conn().execute(
            "INSERT INTO activity_logs (activity_type, user_id, idea_id, comment_id, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                kind.as_str(),
                refs.user_id,
                refs.idea_id,
                refs.comment_id,
                metadata,
                now_str,
            ],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    /// Most recent activity, newest first, joined with usernames, idea
    /// titles and comment text.
    ///
    /// Entries for anonymous comments carry no user: the row stays linked
    /// in the log but the feed shows "Anonymous".
    pub fn recent_activity(&self, limit: u32) -> Result<Vec<ActivityEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT
                al.id, al.activity_type, al.user_id, al.idea_id, al.comment_id,
                al.metadata, u.username, i.title, c.content, al.created_at,
                COALESCE(c.is_anonymous, 0)
             FROM activity_logs al
             LEFT JOIN users u ON al.user_id = u.id
             LEFT JOIN ideas i ON al.idea_id = i.id
             LEFT JOIN comments c ON al.comment_id = c.id
             ORDER BY al.created_at DESC, al.id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], row_to_activity)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Number of activity rows of one kind.
    pub fn count_activity(&self, kind: ActivityKind) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM activity_logs WHERE activity_type = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_activity(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActivityEntry> {
    let activity_type: String = row.get(1)?;
    let metadata_str: Option<String> = row.get(5)?;
    let idea_title: Option<String> = row.get(7)?;
    let created_str: String = row.get(9)?;
    let anonymous: bool = row.get(10)?;

    let (user_id, username): (Option<i64>, Option<String>) = if anonymous {
        (None, None)
    } else {
        (row.get(2)?, row.get(6)?)
    };

    // Metadata is informational; a row with unparseable JSON still shows.
    let metadata = metadata_str.and_then(|s| serde_json::from_str(&s).ok());
    let summary = describe_activity(&activity_type, username.as_deref(), idea_title.as_deref());

    Ok(ActivityEntry {
        id: row.get(0)?,
        user_id,
        idea_id: row.get(3)?,
        comment_id: row.get(4)?,
        metadata,
        username,
        idea_title,
        comment_content: row.get(8)?,
        summary,
        activity_type,
        created_at: parse_timestamp(9, &created_str)?,
    })
}
