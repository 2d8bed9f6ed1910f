//! # ideaboard-server
//!
//! HTTP API for the community idea board: accounts and role gates, ideas
//! with tags and progress tracking, comments, likes and the activity feed.
//!
//! The binary in `main.rs` wires configuration, the persistence
//! [`gateway::Gateway`] and the router from [`api`] together.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rate_limit;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support {
    use ideaboard_shared::{Identity, Role};
    use ideaboard_store::{Database, NewUser, User};

    pub fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("server.db")).unwrap();
        (dir, db)
    }

    pub fn seed_user(db: &Database, username: &str, role: Role) -> User {
        db.create_user(&NewUser {
            username,
            email: None,
            password_hash: "$argon2id$stub",
            role: role.as_str(),
        })
        .unwrap()
    }

    pub fn identity(user: User) -> Identity {
        Identity {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}
