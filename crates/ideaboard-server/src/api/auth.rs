use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use ideaboard_shared::Role;
use ideaboard_store::{StoreError, User};

use super::extract::{JsonBody, PathParams};
use super::AppState;
use crate::auth::{require_founder, AuthUser};
use crate::error::ServerError;
use crate::services::accounts::{self, LoginRequest, RegisterRequest};

#[derive(Deserialize)]
pub(super) struct RoleChange {
    #[serde(default)]
    role: String,
}

fn token_response(state: &AppState, user: User) -> Result<Json<Value>, ServerError> {
    let token = state.tokens.issue(&user)?;
    Ok(Json(json!({ "token": token, "user": user })))
}

pub(super) async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let user = state
        .gateway
        .run(move |db| accounts::register(db, &req))
        .await?;
    Ok((StatusCode::CREATED, token_response(&state, user)?))
}

pub(super) async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<Value>, ServerError> {
    let user = state.gateway.run(move |db| accounts::login(db, &req)).await?;
    token_response(&state, user)
}

pub(super) async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Value>, ServerError> {
    let user = state
        .gateway
        .run(move |db| {
            db.get_user(identity.id).map_err(|e| match e {
                StoreError::NotFound => ServerError::NotFound("User not found".into()),
                other => other.into(),
            })
        })
        .await?;
    Ok(Json(json!({ "user": user })))
}

pub(super) async fn set_role(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    PathParams(user_id): PathParams<i64>,
    JsonBody(change): JsonBody<RoleChange>,
) -> Result<Json<Value>, ServerError> {
    require_founder(Some(&actor))?;
    let role: Role = change
        .role
        .trim()
        .parse()
        .map_err(|e: ideaboard_shared::UnknownRole| ServerError::Validation(e.to_string()))?;

    let user = state
        .gateway
        .run(move |db| accounts::set_role(db, Some(&actor), user_id, role))
        .await?;
    Ok(Json(json!({ "message": "Role updated", "user": user })))
}
