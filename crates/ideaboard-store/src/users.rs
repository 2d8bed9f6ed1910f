//! CRUD operations for [`User`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{now_timestamp, parse_timestamp, Database};
use crate::error::{is_unique_violation, not_found, Result, StoreError};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new user. A taken username yields [`StoreError::Conflict`].
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<User> {
        let (now, now_str) = now_timestamp();

        self.conn()
            .execute(
                "INSERT INTO users (username, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.username, user.email, user.password_hash, user.role, now_str],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("username '{}' is taken", user.username))
                } else {
                    StoreError::Sqlite(e)
                }
            })?;

        Ok(User {
            id: self.conn().last_insert_rowid(),
            username: user.username.to_string(),
            email: user.email.map(str::to_string),
            password_hash: user.password_hash.to_string(),
            role: user.role.to_string(),
            created_at: now,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single user by id.
    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .map_err(not_found)
    }

    /// Look a user up by username. `None` if no such user exists.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Change a user's role label.
    pub fn set_user_role(&self, id: i64, role: &str) -> Result<()> {
        let affected = self
            .conn()
            .execute("UPDATE users SET role = ?1 WHERE id = ?2", params![role, id])?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_str: String = row.get(5)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        created_at: parse_timestamp(5, &created_str)?,
    })
}
