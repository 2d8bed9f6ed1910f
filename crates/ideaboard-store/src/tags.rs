//! Tag lookup and the `idea_tags` join table.

use rusqlite::params;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Return the id of the tag called `name`, creating it if needed.
    ///
    /// The insert defers to the `UNIQUE(name)` constraint: when another
    /// writer created the same tag first, the conflicting insert is a no-op
    /// and the existing row is returned.
    pub fn get_or_create_tag(&self, name: &str) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO tags (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;

        let id = self.conn().query_row(
            "SELECT id FROM tags WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Link a tag to an idea. Linking twice is a no-op.
    pub fn link_tag(&self, idea_id: i64, tag_id: i64) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO idea_tags (idea_id, tag_id) VALUES (?1, ?2)",
            params![idea_id, tag_id],
        )?;
        Ok(())
    }

    /// Tag names attached to an idea, alphabetically.
    pub fn tags_for_idea(&self, idea_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            "SELECT t.name FROM tags t
             INNER JOIN idea_tags it ON t.id = it.tag_id
             WHERE it.idea_id = ?1
             ORDER BY t.name ASC",
        )?;

        let rows = stmt.query_map(params![idea_id], |row| row.get(0))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }

    /// Every tag name, alphabetically.
    pub fn list_tag_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare("SELECT name FROM tags ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }
}
