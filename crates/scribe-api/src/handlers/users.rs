//! Profile handlers
//!
//! GET /profile/id/:id (public), GET /profile/mine (authenticated)

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};
use crate::response;

/// Public view of a user: name, picture and roles only.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users
        .fetch_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not registered"))?;

    Ok(response::ok(
        "profile",
        serde_json::json!({
            "name": user.name,
            "profilePicUrl": user.profile_pic_url,
            "roles": user.roles,
        }),
    ))
}

/// The authenticated user's own record.
pub async fn my_profile(user: CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(response::ok("profile", user.0.as_ref().clone()))
}
