//! # ideaboard-shared
//!
//! Types shared by the store and the HTTP server: the role policy, the
//! authenticated identity carried by tokens, activity kinds and
//! application-wide constants.

pub mod constants;
pub mod error;
pub mod identity;
pub mod roles;
pub mod types;

pub use error::UnknownRole;
pub use identity::Identity;
pub use roles::Role;
pub use types::ActivityKind;
