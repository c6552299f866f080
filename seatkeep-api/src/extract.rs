//! `Query` and `Path` with failures reported as JSON `AppError`s instead of
//! axum's plain text rejections.

use axum::extract::{FromRequestParts, Path, Query};

use crate::error::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
