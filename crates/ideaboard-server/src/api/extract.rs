//! Request extractors whose rejections are [`ServerError`]s.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub(super) struct JsonBody<T>(pub T);

/// Query string.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub(super) struct QueryParams<T>(pub T);

/// Path parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub(super) struct PathParams<T>(pub T);
