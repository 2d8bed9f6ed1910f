//! Append-only progress audit trail.

use rusqlite::params;

use crate::database::{now_timestamp, parse_timestamp, Database};
use crate::error::Result;
use crate::models::ProgressLogEntry;

impl Database {
    /// Record a progress change. Returns the new row id.
    pub fn log_progress(
        &self,
        idea_id: i64,
        old_progress: i64,
        new_progress: i64,
        notes: Option<&str>,
        user_id: Option<i64>,
    ) -> Result<i64> {
        let (_, now_str) = now_timestamp();

        self.conn().execute(
            "INSERT INTO progress_logs (idea_id, old_progress, new_progress, notes, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![idea_id, old_progress, new_progress, notes, user_id, now_str],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    /// Progress changes for an idea, newest first.
    pub fn progress_history(&self, idea_id: i64) -> Result<Vec<ProgressLogEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, idea_id, old_progress, new_progress, notes, user_id, created_at
             FROM progress_logs
             WHERE idea_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![idea_id], |row| {
            let created_str: String = row.get(6)?;
            Ok(ProgressLogEntry {
                id: row.get(0)?,
                idea_id: row.get(1)?,
                old_progress: row.get(2)?,
                new_progress: row.get(3)?,
                notes: row.get(4)?,
                user_id: row.get(5)?,
                created_at: parse_timestamp(6, &created_str)?,
            })
        })?;

        let mut history = Vec::new();
        for row in rows {
            history.push(row?);
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{open_temp, seed_idea, seed_user};

    #[test]
    fn history_is_newest_first() {
        let (_dir, db) = open_temp();
        let user = seed_user(&db, "ada", "founder");
        let idea = seed_idea(&db, user, "Solar");

        db.log_progress(idea, 0, 25, Some("kickoff"), Some(user)).unwrap();
        db.log_progress(idea, 25, 60, None, Some(user)).unwrap();

        let history = db.progress_history(idea).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].old_progress, history[0].new_progress), (25, 60));
        assert_eq!(history[1].notes.as_deref(), Some("kickoff"));
    }
}
