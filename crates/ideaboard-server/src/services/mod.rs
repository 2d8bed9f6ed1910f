//! Request-independent business rules.
//!
//! Every function takes a [`Database`](ideaboard_store::Database) handle
//! and the caller's identity explicitly; none of them hold state between
//! calls. Multi-row writes run in one transaction.

pub mod accounts;
pub mod engagement;
pub mod ideas;

use ideaboard_store::StoreError;

use crate::error::ServerError;

/// Map a store `NotFound` on an idea lookup to a 404.
pub(crate) fn idea_lookup(e: StoreError) -> ServerError {
    match e {
        StoreError::NotFound => ServerError::idea_not_found(),
        other => other.into(),
    }
}
