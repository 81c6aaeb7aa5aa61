//! Author workflow (requires the AUTHOR role)
//!
//! POST/PUT /author/blog, GET/DELETE /author/blog/id/:id,
//! PUT /author/blog/submit/:id, PUT /author/blog/withdraw/:id,
//! GET /author/blogs/{drafts,submitted,published}

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use scribe_core::pagination::PaginationParams;
use scribe_db::repository::{BlogPatch, NewBlog};

use crate::dto::{BlogCreate, BlogUpdate};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentUser};
use crate::response;

/// Create a new draft owned by the caller.
pub async fn create_draft(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BlogCreate>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    if state.blogs.slug_exists(&payload.slug).await? {
        return Err(ApiError::bad_request("blog with this slug already exists"));
    }

    let blog = state
        .blogs
        .create_draft(NewBlog {
            title: payload.title,
            description: payload.description,
            draft_text: payload.text,
            tags: payload.tags,
            author_id: user.id,
            img_url: payload.img_url,
            slug: payload.slug,
        })
        .await?;

    Ok(response::ok("blog created", blog))
}

/// Edit the caller's own blog; only the fields present in the payload
/// change.
pub async fn update_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BlogUpdate>,
) -> ApiResult<impl IntoResponse> {
    payload.validate().map_err(ApiError::validation)?;

    let current = state
        .blogs
        .find_for_author(payload.id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;

    if let Some(slug) = &payload.slug {
        if *slug != current.slug && state.blogs.slug_exists(slug).await? {
            return Err(ApiError::bad_request("blog with this slug already exists"));
        }
    }

    let blog = state
        .blogs
        .update_blog(
            payload.id,
            user.id,
            BlogPatch {
                title: payload.title,
                description: payload.description,
                draft_text: payload.text,
                tags: payload.tags,
                img_url: payload.img_url,
                slug: payload.slug,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;

    // live copies age out of the slug cache on their TTL
    state.blog_cache.invalidate(&format!("id_{}", blog.id)).await;
    Ok(response::ok("blog updated", blog))
}

/// The caller's own blog in any workflow state.
pub async fn blog_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let blog = state
        .blogs
        .find_for_author(id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;
    Ok(response::ok("blog", blog))
}

/// Soft-delete the caller's own blog.
pub async fn delete_blog(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.blogs.delete_blog(id, user.id).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    state.blog_cache.invalidate(&format!("id_{id}")).await;
    Ok(response::message("blog deleted"))
}

/// Submit the caller's own draft for editorial review.
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.blogs.set_submitted(id, user.id, true).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    Ok(response::message("blog submitted"))
}

/// Pull the caller's own draft back out of review.
pub async fn withdraw(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.blogs.set_submitted(id, user.id, false).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    Ok(response::message("blog withdrawn"))
}

pub async fn drafts(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.drafts_for_author(user.id, pagination).await?;
    Ok(response::ok("draft blogs", blogs))
}

pub async fn submitted(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.submitted_for_author(user.id, pagination).await?;
    Ok(response::ok("submitted blogs", blogs))
}

pub async fn published(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<impl IntoResponse> {
    let blogs = state.blogs.published_for_author(user.id, pagination).await?;
    Ok(response::ok("published blogs", blogs))
}
