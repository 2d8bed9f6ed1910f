use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use ideaboard_shared::roles::{self, Role};
use ideaboard_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No credential was presented.
    #[error("{0}")]
    Unauthenticated(String),

    /// A credential was presented but did not verify.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The caller's role is not allowed here.
    #[error("{message}")]
    Forbidden {
        message: String,
        required_roles: Vec<&'static str>,
        your_role: Option<String>,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn forbidden_role(message: impl Into<String>, required: &[Role], your_role: &str) -> Self {
        ServerError::Forbidden {
            message: message.into(),
            required_roles: roles::labels(required),
            your_role: Some(your_role.to_string()),
        }
    }

    /// Forbidden with no role hint, for actions no role unlocks.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ServerError::Forbidden {
            message: message.into(),
            required_roles: Vec::new(),
            your_role: None,
        }
    }

    pub fn idea_not_found() -> Self {
        ServerError::NotFound("Idea not found".into())
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => ServerError::Conflict(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

// Malformed requests are validation failures with the usual JSON body.

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServerError::InvalidToken => StatusCode::FORBIDDEN,
            ServerError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            ServerError::Forbidden {
                message,
                required_roles,
                your_role,
            } => {
                let mut body = serde_json::json!({ "error": message });
                if !required_roles.is_empty() {
                    body["requiredRoles"] = serde_json::json!(required_roles);
                    body["yourRole"] = serde_json::json!(your_role);
                }
                body
            }
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                serde_json::json!({ "error": "Internal server error" })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
