//! Like rows, keyed on either a user or a requester address.

use rusqlite::{params, OptionalExtension};

use crate::database::{now_timestamp, Database};
use crate::error::Result;
use crate::models::LikeKey;

impl LikeKey {
    /// `(user_id, ip_address)` column values; exactly one is set.
    fn columns(&self) -> (Option<i64>, Option<&str>) {
        match self {
            LikeKey::User(id) => (Some(*id), None),
            LikeKey::Address(addr) => (None, Some(addr.as_str())),
        }
    }
}

impl Database {
    /// Id of the like `key` holds on `idea_id`, if any.
    pub fn find_like(&self, idea_id: i64, key: &LikeKey) -> Result<Option<i64>> {
        let found = match key {
            LikeKey::User(user_id) => self
                .conn()
                .query_row(
                    "SELECT id FROM likes WHERE idea_id = ?1 AND user_id = ?2",
                    params![idea_id, user_id],
                    |row| row.get(0),
                )
                .optional()?,
            LikeKey::Address(addr) => self
                .conn()
                .query_row(
                    "SELECT id FROM likes WHERE idea_id = ?1 AND ip_address = ?2",
                    params![idea_id, addr],
                    |row| row.get(0),
                )
                .optional()?,
        };
        Ok(found)
    }

    /// Insert a like. Returns `false` when the unique index already holds
    /// one for this key, which callers treat as success.
    pub fn insert_like(&self, idea_id: i64, key: &LikeKey) -> Result<bool> {
        let (_, now_str) = now_timestamp();
        let (user_id, ip_address) = key.columns();

        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO likes (idea_id, user_id, ip_address, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![idea_id, user_id, ip_address, now_str],
        )?;
        Ok(inserted > 0)
    }

    /// Delete a like by id.  Returns `true` if a row was deleted.
    pub fn delete_like(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM likes WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Number of likes on an idea.
    pub fn count_likes(&self, idea_id: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM likes WHERE idea_id = ?1",
            params![idea_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open_temp, seed_idea, seed_user};

    #[test]
    fn one_like_per_key_per_idea() {
        let (_dir, db) = open_temp();
        let user = seed_user(&db, "ada", "contributor");
        let idea = seed_idea(&db, user, "Solar");

        let by_user = LikeKey::User(user);
        let by_addr = LikeKey::Address("10.0.0.7".into());

        assert!(db.insert_like(idea, &by_user).unwrap());
        assert!(!db.insert_like(idea, &by_user).unwrap());
        assert!(db.insert_like(idea, &by_addr).unwrap());
        assert!(!db.insert_like(idea, &by_addr).unwrap());

        assert_eq!(db.count_likes(idea).unwrap(), 2);
    }

    #[test]
    fn find_and_delete() {
        let (_dir, db) = open_temp();
        let user = seed_user(&db, "ada", "contributor");
        let idea = seed_idea(&db, user, "Solar");
        let key = LikeKey::Address("::1".into());

        assert!(db.find_like(idea, &key).unwrap().is_none());
        db.insert_like(idea, &key).unwrap();

        let id = db.find_like(idea, &key).unwrap().unwrap();
        assert!(db.find_like(idea, &LikeKey::User(user)).unwrap().is_none());
        assert!(db.delete_like(id).unwrap());
        assert!(!db.delete_like(id).unwrap());
        assert_eq!(db.count_likes(idea).unwrap(), 0);
    }
}
