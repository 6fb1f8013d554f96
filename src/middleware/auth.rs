use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::error::HubError;
use crate::router::HubState;
use crate::types::Caller;

/// Caller identity resolved from `Authorization: Bearer <token>`.
///
/// Rejects with 401 when the header is missing or the token is unknown or
/// expired, so handlers never run for unauthenticated requests.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub caller: Caller,
    pub token: String,
}

impl FromRequestParts<HubState> for Authenticated {
    type Rejection = HubError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &HubState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| HubError::Unauthorized)?;
        let token = bearer.token().to_string();
        let caller = state.sessions.verify(&token)?;
        Ok(Self { caller, token })
    }
}
