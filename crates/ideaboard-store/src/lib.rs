//! # ideaboard-store
//!
//! SQLite persistence for the idea board.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every table:
//! users, ideas, tags, comments, likes and the two append-only logs.
//! Multi-statement writes go through [`Database::in_transaction`].

pub mod activity;
pub mod comments;
pub mod database;
pub mod ideas;
pub mod likes;
pub mod migrations;
pub mod models;
pub mod progress;
pub mod tags;
pub mod users;

mod error;

pub use activity::ActivityRefs;
pub use database::Database;
pub use error::StoreError;
pub use models::*;
