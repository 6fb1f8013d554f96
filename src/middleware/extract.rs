use axum::extract::{FromRequest, FromRequestParts};

use crate::error::HubError;

/// `axum::Json` whose rejections render as `HubError::InvalidInput`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(HubError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejections render as `HubError::InvalidInput`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HubError))]
pub struct ApiPath<T>(pub T);
