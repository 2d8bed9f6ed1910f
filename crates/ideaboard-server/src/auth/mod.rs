//! Authentication and authorization.
//!
//! - [`token`]: signed identity tokens (HS256)
//! - [`password`]: argon2id password hashing
//! - [`gate`]: role gates run after a token has been verified
//! - [`extract`]: axum extractors that attach the caller's identity

pub mod extract;
pub mod gate;
pub mod password;
pub mod token;

pub use extract::{AuthUser, MaybeUser};
pub use gate::{require_admin, require_founder};
pub use password::{hash_password, verify_password};
pub use token::TokenService;
