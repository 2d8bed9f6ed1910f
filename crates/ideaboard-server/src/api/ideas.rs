use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use ideaboard_store::IdeaFilter;

use super::extract::{JsonBody, PathParams, QueryParams};
use super::AppState;
use crate::auth::{require_admin, AuthUser};
use crate::error::ServerError;
use crate::services::ideas::{self, CreateIdea, ProgressUpdate};

pub(super) async fn list(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<IdeaFilter>,
) -> Result<Json<Value>, ServerError> {
    let ideas = state.gateway.run(move |db| ideas::list(db, &filter)).await?;
    Ok(Json(json!({ "ideas": ideas })))
}

pub(super) async fn tags(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let tags = state.gateway.run(ideas::list_tags).await?;
    Ok(Json(json!({ "tags": tags })))
}

pub(super) async fn get_one(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Json<Value>, ServerError> {
    let idea = state.gateway.run(move |db| ideas::get_by_id(db, id)).await?;
    Ok(Json(json!({ "idea": idea })))
}

pub(super) async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(input): JsonBody<CreateIdea>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    require_admin(Some(&user))?;
    let idea = state
        .gateway
        .run(move |db| ideas::create(db, &user, &input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Idea created successfully", "idea": idea })),
    ))
}

pub(super) async fn update_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<ProgressUpdate>,
) -> Result<Json<Value>, ServerError> {
    require_admin(Some(&user))?;
    let progress = state
        .gateway
        .run(move |db| ideas::update_progress(db, id, &update, &user))
        .await?;
    Ok(Json(json!({ "message": "Progress updated", "progress": progress })))
}

pub(super) async fn progress_history(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> Result<Json<Value>, ServerError> {
    let history = state
        .gateway
        .run(move |db| ideas::progress_history(db, id))
        .await?;
    Ok(Json(json!({ "history": history })))
}
