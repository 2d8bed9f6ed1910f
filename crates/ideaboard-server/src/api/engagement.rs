use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::{JsonBody, PathParams, QueryParams};
use super::AppState;
use crate::auth::extract::ClientAddr;
use crate::auth::MaybeUser;
use crate::error::ServerError;
use crate::services::engagement::{self, NewCommentRequest};

#[derive(Deserialize)]
pub(super) struct ActivityQuery {
    limit: Option<String>,
}

pub(super) async fn list_comments(
    State(state): State<AppState>,
    PathParams(idea_id): PathParams<i64>,
) -> Result<Json<Value>, ServerError> {
    let comments = state
        .gateway
        .run(move |db| engagement::list_comments(db, idea_id))
        .await?;
    Ok(Json(json!({ "comments": comments })))
}

pub(super) async fn add_comment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    PathParams(idea_id): PathParams<i64>,
    JsonBody(req): JsonBody<NewCommentRequest>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let comment = state
        .gateway
        .run(move |db| engagement::add_comment(db, idea_id, user.as_ref(), &req))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Comment added successfully", "comment": comment })),
    ))
}

pub(super) async fn toggle_like(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    ClientAddr(addr): ClientAddr,
    PathParams(idea_id): PathParams<i64>,
) -> Result<Json<Value>, ServerError> {
    let outcome = state
        .gateway
        .run(move |db| engagement::toggle_like(db, idea_id, user.as_ref(), &addr))
        .await?;
    let message = if outcome.liked { "Like added" } else { "Like removed" };
    Ok(Json(json!({
        "message": message,
        "liked": outcome.liked,
        "likeCount": outcome.like_count,
    })))
}

pub(super) async fn activity(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ActivityQuery>,
) -> Result<Json<Value>, ServerError> {
    let limit = engagement::activity_limit(query.limit.as_deref());
    let activities = state
        .gateway
        .run(move |db| engagement::recent_activity(db, limit))
        .await?;
    Ok(Json(json!({ "activities": activities })))
}
