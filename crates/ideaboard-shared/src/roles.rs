//! Role policy.
//!
//! Roles form a fixed hierarchy used for every authorization decision:
//!
//! | Role          | Level |
//! |---------------|-------|
//! | `founder`     | 4     |
//! | `core_team`   | 3     |
//! | `contributor` | 2     |
//! | `viewer`      | 1     |
//!
//! Tokens carry the role as a raw label, so the label-based helpers below
//! are the ones the server calls. A label that does not name a known role
//! gets [`UNKNOWN_ROLE_LEVEL`], which sits below `viewer` and therefore
//! never satisfies any check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownRole;

/// Level assigned to unrecognized role labels.
pub const UNKNOWN_ROLE_LEVEL: u8 = 0;

/// Roles allowed through the admin gate.
pub const ADMIN_ROLES: [Role; 2] = [Role::Founder, Role::CoreTeam];

/// Roles allowed through the founder gate.
pub const FOUNDER_ROLES: [Role; 1] = [Role::Founder];

/// Community roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    Viewer = 1,
    Contributor = 2,
    CoreTeam = 3,
    Founder = 4,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Founder, Role::CoreTeam, Role::Contributor, Role::Viewer];

    /// Ordinal privilege level.
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Founder => "founder",
            Role::CoreTeam => "core_team",
            Role::Contributor => "contributor",
            Role::Viewer => "viewer",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Founder | Role::CoreTeam)
    }

    /// Roles a user may pick for themselves when registering.
    pub fn is_self_assignable(self) -> bool {
        matches!(self, Role::Contributor | Role::Viewer)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Contributor
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "founder" => Ok(Role::Founder),
            "core_team" => Ok(Role::CoreTeam),
            "contributor" => Ok(Role::Contributor),
            "viewer" => Ok(Role::Viewer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Privilege level for a raw role label.
pub fn role_level(label: &str) -> u8 {
    label
        .parse::<Role>()
        .map(Role::level)
        .unwrap_or(UNKNOWN_ROLE_LEVEL)
}

pub fn is_admin(label: &str) -> bool {
    label.parse::<Role>().map(Role::is_admin).unwrap_or(false)
}

pub fn is_founder(label: &str) -> bool {
    matches!(label.parse::<Role>(), Ok(Role::Founder))
}

/// Whether `label` is at least as privileged as `required`.
pub fn has_role(label: &str, required: Role) -> bool {
    role_level(label) >= required.level()
}

/// Labels of a role set, in the order given.
pub fn labels(roles: &[Role]) -> Vec<&'static str> {
    roles.iter().map(|r| r.as_str()).collect()
}
