//! Contact messages
//!
//! POST /contact

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::MessageCreate;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AppState;
use crate::response;

pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<MessageCreate>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    let message = state
        .messages
        .create_message(&payload.kind, &payload.msg)
        .await?;

    Ok(response::ok("message received", message))
}
