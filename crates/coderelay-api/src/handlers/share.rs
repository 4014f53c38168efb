//! Share check, create, and receive handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use coderelay_core::error::AppError;
use coderelay_core::types::Availability;

use crate::dto::request::ShareRequest;
use crate::dto::response::{AvailabilityResponse, ShareCreatedResponse, ShareDataResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /check/{code}
///
/// A free code answers 404 and a taken one 409, matching the relay's
/// established wire contract.
pub async fn check_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    match state.relay.check_availability(&code).await? {
        Availability::Available => Ok((
            StatusCode::NOT_FOUND,
            Json(AvailabilityResponse { available: true }),
        )
            .into_response()),
        Availability::InUse => Err(AppError::conflict("Code in use").into()),
    }
}

/// POST /share
pub async fn create_share(
    State(state): State<AppState>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShareCreatedResponse>), ApiError> {
    let Json(req) = payload?;

    let expires_at = state
        .relay
        .store(&req.code, &req.data, req.expires_minutes)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShareCreatedResponse {
            status: "created".to_string(),
            expires_at,
        }),
    ))
}

/// GET /receive/{code}
pub async fn receive_share(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ShareDataResponse>, ApiError> {
    let data = state.relay.retrieve(&code).await?;
    Ok(Json(ShareDataResponse { data }))
}
