//! Account service: registration, login and role management.

use serde::Deserialize;
use tracing::{info, warn};

use ideaboard_shared::constants::MIN_PASSWORD_LEN;
use ideaboard_shared::{ActivityKind, Identity, Role};
use ideaboard_store::{ActivityRefs, Database, NewUser, StoreError, User};

use crate::auth::{hash_password, require_founder, verify_password};
use crate::error::ServerError;

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Create an account and log `user_registered`.
///
/// Self-registration may only choose `contributor` (the default) or
/// `viewer`; privileged roles are granted by a founder afterwards.
pub fn register(db: &Database, request: &RegisterRequest) -> Result<User, ServerError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ServerError::Validation("Username is required".into()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServerError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let role = match request.role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(label) => label
            .parse::<Role>()
            .map_err(|e| ServerError::Validation(e.to_string()))?,
    };
    if !role.is_self_assignable() {
        return Err(ServerError::forbidden(
            "Privileged roles are granted by a founder, not at registration",
        ));
    }

    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    create_account(db, username, email, &request.password, role)
}

/// Insert a user with a hashed password and log `user_registered`.
pub fn create_account(
    db: &Database,
    username: &str,
    email: Option<&str>,
    password: &str,
    role: Role,
) -> Result<User, ServerError> {
    let password_hash = hash_password(password)?;

    let user = db.in_transaction(|db| -> Result<User, ServerError> {
        let user = db.create_user(&NewUser {
            username,
            email,
            password_hash: &password_hash,
            role: role.as_str(),
        })?;

        db.log_activity(
            ActivityKind::UserRegistered,
            ActivityRefs {
                user_id: Some(user.id),
                ..Default::default()
            },
            None,
        )?;

        Ok(user)
    })?;

    info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
    Ok(user)
}

/// Check credentials. Unknown users and wrong passwords look the same.
pub fn login(db: &Database, request: &LoginRequest) -> Result<User, ServerError> {
    let invalid = || ServerError::Unauthenticated("Invalid username or password".into());

    let user = db
        .find_user_by_username(request.username.trim())?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password_hash)? {
        warn!(username = %user.username, "failed login");
        return Err(invalid());
    }

    Ok(user)
}

/// Change a user's role. Founders only.
pub fn set_role(
    db: &Database,
    actor: Option<&Identity>,
    user_id: i64,
    role: Role,
) -> Result<User, ServerError> {
    let actor = require_founder(actor)?;

    db.set_user_role(user_id, role.as_str()).map_err(|e| match e {
        StoreError::NotFound => ServerError::NotFound("User not found".into()),
        other => other.into(),
    })?;

    info!(user_id, role = %role, by = %actor.username, "role changed");
    Ok(db.get_user(user_id)?)
}

/// Create the configured founder account if the username is free.
pub fn bootstrap_founder(db: &Database, username: &str, password: &str) -> Result<bool, ServerError> {
    if db.find_user_by_username(username)?.is_some() {
        return Ok(false);
    }
    create_account(db, username, None, password, Role::Founder)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{identity, open_temp, seed_user};

    fn request(username: &str, role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: Some("ada@example.org".into()),
            password: "correct-horse".into(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn register_then_login() {
        let (_dir, db) = open_temp();
        let user = register(&db, &request("ada", None)).unwrap();
        assert_eq!(user.role, "contributor");
        assert_eq!(db.count_activity(ActivityKind::UserRegistered).unwrap(), 1);

        let logged_in = login(
            &db,
            &LoginRequest {
                username: "ada".into(),
                password: "correct-horse".into(),
            },
        )
        .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn bad_credentials_are_unauthenticated() {
        let (_dir, db) = open_temp();
        register(&db, &request("ada", None)).unwrap();

        for (username, password) in [("ada", "wrong-password"), ("nobody", "correct-horse")] {
            let res = login(
                &db,
                &LoginRequest {
                    username: username.into(),
                    password: password.into(),
                },
            );
            assert!(matches!(res, Err(ServerError::Unauthenticated(_))));
        }
    }

    #[test]
    fn registration_validation() {
        let (_dir, db) = open_temp();

        assert!(matches!(
            register(&db, &request("  ", None)),
            Err(ServerError::Validation(_))
        ));

        let mut short = request("ada", None);
        short.password = "short".into();
        assert!(matches!(register(&db, &short), Err(ServerError::Validation(_))));

        assert!(matches!(
            register(&db, &request("ada", Some("overlord"))),
            Err(ServerError::Validation(_))
        ));
        match register(&db, &request("ada", Some("founder"))) {
            Err(ServerError::Forbidden {
                required_roles,
                your_role,
                ..
            }) => {
                assert!(required_roles.is_empty());
                assert_eq!(your_role, None);
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
        assert!(matches!(
            register(&db, &request("ada", Some("core_team"))),
            Err(ServerError::Forbidden { .. })
        ));

        let viewer = register(&db, &request("ada", Some("viewer"))).unwrap();
        assert_eq!(viewer.role, "viewer");
    }

    #[test]
    fn duplicate_username_conflicts() {
        let (_dir, db) = open_temp();
        register(&db, &request("ada", None)).unwrap();
        assert!(matches!(
            register(&db, &request("ada", None)),
            Err(ServerError::Conflict(_))
        ));
        assert_eq!(db.count_activity(ActivityKind::UserRegistered).unwrap(), 1);
    }

    #[test]
    fn only_founders_change_roles() {
        let (_dir, db) = open_temp();
        let founder = identity(seed_user(&db, "ada", Role::Founder));
        let core = identity(seed_user(&db, "bo", Role::CoreTeam));
        let target = seed_user(&db, "cy", Role::Contributor);

        assert!(matches!(
            set_role(&db, Some(&core), target.id, Role::CoreTeam),
            Err(ServerError::Forbidden { .. })
        ));
        assert!(matches!(
            set_role(&db, None, target.id, Role::CoreTeam),
            Err(ServerError::Unauthenticated(_))
        ));

        let promoted = set_role(&db, Some(&founder), target.id, Role::CoreTeam).unwrap();
        assert_eq!(promoted.role, "core_team");

        assert!(matches!(
            set_role(&db, Some(&founder), 999, Role::Viewer),
            Err(ServerError::NotFound(_))
        ));
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let (_dir, db) = open_temp();
        assert!(bootstrap_founder(&db, "root", "long-enough-pw").unwrap());
        assert!(!bootstrap_founder(&db, "root", "long-enough-pw").unwrap());
        let user = db.find_user_by_username("root").unwrap().unwrap();
        assert_eq!(user.role, "founder");
    }
}
