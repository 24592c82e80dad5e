use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::models::ClientId;

/// Opaque client identity taken from the `X-Client-Id` header.
///
/// Authentication itself is an external collaborator; the core only needs a
/// stable identifier to scope holds and bookings to.
#[derive(Debug, Clone, Copy)]
pub struct ClientIdentity(pub ClientId);

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-client-id")
            .and_then(|value| value.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "X-Client-Id header required".to_string(),
            ))?;

        let client_id: ClientId = raw.trim().parse().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "X-Client-Id must be an integer".to_string(),
            )
        })?;
        if client_id <= 0 {
            return Err((
                StatusCode::UNAUTHORIZED,
                "X-Client-Id must be positive".to_string(),
            ));
        }
        Ok(ClientIdentity(client_id))
    }
}
