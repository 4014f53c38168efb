//! Per-client admission gate for the relay routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::extractors::ClientIdentity;
use crate::state::AppState;

/// Spends one token from the caller's budget before the route's own
/// extractors run, so a throttled client is answered with 429 without its
/// body being read.
pub async fn admission(
    State(state): State<AppState>,
    client: ClientIdentity,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(err) = state.relay.admit(client.as_str()).await {
        tracing::debug!(client = %client.as_str(), "Request rejected by rate limiter");
        return Err(err.into());
    }

    Ok(next.run(request).await)
}
