//! Success response envelope

use axum::Json;
use serde::Serialize;

/// `{message, data}` body used by every successful endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        message: message.into(),
        data,
    })
}

/// `{message}` body for endpoints with nothing to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn message(message: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: message.into(),
    })
}
