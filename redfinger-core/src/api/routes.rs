use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use redfinger_common::models::{RedeemRecord, SubmissionRequest};

use super::AppState;
use super::error::ApiError;

pub const SUBMITTED_MESSAGE: &str = "Redeem code submitted and is being processed!";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: RedeemRecord,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub redeems: Vec<RedeemRecord>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// `POST /redeem`
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!("Unreadable redeem payload: {}", e);
        ApiError::MalformedPayload
    })?;

    let record = state.service.submit(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: SUBMITTED_MESSAGE,
            data: record,
        }),
    ))
}

/// `GET /redeem[?limit=N]`
pub async fn history_handler(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        debug!("Unreadable history query: {}", e);
        ApiError::MalformedPayload
    })?;

    let redeems = state.service.history(query.limit).await?;
    Ok(Json(HistoryResponse { redeems }))
}
