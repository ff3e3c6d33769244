use axum::extract::FromRequestParts;

use crate::error::ApiError;

/// `Path` whose rejection renders as an envelope instead of plain text.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
