//! Editor workflow (requires the EDITOR role)
//!
//! GET /editor/blog/id/:id, PUT /editor/blog/publish/:id,
//! PUT /editor/blog/unpublish/:id,
//! GET /editor/blogs/{submitted,published}

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use scribe_core::pagination::PaginationParams;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AppState;
use crate::response;

/// Any live blog regardless of workflow state, for review.
pub async fn blog_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let blog = state
        .blogs
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;
    Ok(response::ok("blog", blog))
}

pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.blogs.publish(id).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    state.blog_cache.invalidate(&format!("id_{id}")).await;
    Ok(response::message("blog published"))
}

pub async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.blogs.unpublish(id).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    // slug-keyed cache entries age out on their TTL
    state.blog_cache.invalidate(&format!("id_{id}")).await;
    Ok(response::message("blog unpublished"))
}

pub async fn submitted(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.all_submitted(pagination).await?;
    Ok(response::ok("submitted blogs", blogs))
}

pub async fn published(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.all_published(pagination).await?;
    Ok(response::ok("published blogs", blogs))
}
