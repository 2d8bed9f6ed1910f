//! Role gates.
//!
//! Pure functions over the caller's identity: a missing identity is
//! `Unauthenticated`, an identity with too little privilege is `Forbidden`
//! (naming the roles that would have been accepted), anything else passes
//! through unchanged.

use ideaboard_shared::roles::{ADMIN_ROLES, FOUNDER_ROLES};
use ideaboard_shared::Identity;

use crate::error::ServerError;

fn authentication_required() -> ServerError {
    ServerError::Unauthenticated("Authentication required".into())
}

/// Founder or core team only.
pub fn require_admin(identity: Option<&Identity>) -> Result<&Identity, ServerError> {
    let identity = identity.ok_or_else(authentication_required)?;
    if !identity.is_admin() {
        return Err(ServerError::forbidden_role(
            "Admin privileges required",
            &ADMIN_ROLES,
            &identity.role,
        ));
    }
    Ok(identity)
}

/// Founder only.
pub fn require_founder(identity: Option<&Identity>) -> Result<&Identity, ServerError> {
    let identity = identity.ok_or_else(authentication_required)?;
    if !identity.is_founder() {
        return Err(ServerError::forbidden_role(
            "Founder privileges required",
            &FOUNDER_ROLES,
            &identity.role,
        ));
    }
    Ok(identity)
}
