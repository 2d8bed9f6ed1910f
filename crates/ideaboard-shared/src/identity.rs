use serde::{Deserialize, Serialize};

use crate::roles::{self, Role};

/// The authenticated principal attached to a request.
///
/// Built from verified token claims. `role` is kept as the raw label from
/// the token so that a label this build does not know about still flows
/// through the role policy and fails closed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role: role.as_str().to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        roles::is_admin(&self.role)
    }

    pub fn is_founder(&self) -> bool {
        roles::is_founder(&self.role)
    }

    pub fn has_role(&self, required: Role) -> bool {
        roles::has_role(&self.role, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_checks_delegate_to_policy() {
        let founder = Identity::new(1, "ada", Role::Founder);
        assert!(founder.is_admin());
        assert!(founder.is_founder());

        let core = Identity::new(2, "bo", Role::CoreTeam);
        assert!(core.is_admin());
        assert!(!core.is_founder());

        let forged = Identity {
            id: 3,
            username: "eve".into(),
            role: "root".into(),
        };
        assert!(!forged.is_admin());
        assert!(!forged.has_role(Role::Viewer));
    }
}
