//! Public blog reads
//!
//! GET /blog/id/:id, GET /blog/slug/:slug (TTL-cached),
//! GET /blogs/latest, GET /blogs/tag/:tag

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use scribe_core::pagination::PaginationParams;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AppState;
use crate::response;

const BLOG_CACHE_TTL: Duration = Duration::from_secs(600);

pub async fn blog_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let cache_key = format!("id_{id}");
    if let Some(blog) = state.blog_cache.get(&cache_key).await {
        return Ok(response::ok("blog", blog));
    }

    let blog = state
        .blogs
        .find_published_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;

    if let Err(err) = state.blog_cache.set(&cache_key, &blog, BLOG_CACHE_TTL).await {
        tracing::warn!(%err, "blog cache write failed");
    }
    Ok(response::ok("blog", blog))
}

pub async fn blog_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let cache_key = format!("slug_{slug}");
    if let Some(blog) = state.blog_cache.get(&cache_key).await {
        return Ok(response::ok("blog", blog));
    }

    let blog = state
        .blogs
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;

    if let Err(err) = state.blog_cache.set(&cache_key, &blog, BLOG_CACHE_TTL).await {
        tracing::warn!(%err, "blog cache write failed");
    }
    Ok(response::ok("blog", blog))
}

pub async fn latest(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.latest(pagination).await?;
    Ok(response::ok("latest blogs", blogs))
}

pub async fn tagged(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.tagged(&tag, pagination).await?;
    Ok(response::ok("blogs by tag", blogs))
}
