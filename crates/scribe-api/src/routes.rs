//! Router assembly
//!
//! Gate layout: `/health` sits outside everything; every other route is
//! behind the API-key gate; `/auth/signout`, `/profile/mine` and the
//! author/editor groups additionally pass the authentication gate, and
//! the author/editor groups the authorization gate on top.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use scribe_models::RoleCode;

use crate::extractors::AppState;
use crate::handlers::{auth, author, blogs, contact, editor, health, users};
use crate::middleware as gates;

const AUTHOR_ACCESS: &[RoleCode] = &[RoleCode::Author];
const EDITOR_ACCESS: &[RoleCode] = &[RoleCode::Editor];

/// Create the complete application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/signup/basic", post(auth::signup_basic))
        .route("/auth/signin/basic", post(auth::signin_basic))
        .route("/auth/token/refresh", post(auth::token_refresh))
        .route("/profile/id/:id", get(users::public_profile))
        .route("/blog/id/:id", get(blogs::blog_by_id))
        .route("/blog/slug/:slug", get(blogs::blog_by_slug))
        .route("/blogs/latest", get(blogs::latest))
        .route("/blogs/tag/:tag", get(blogs::tagged))
        .route("/contact", post(contact::create_message));

    let authenticated = Router::new()
        .route("/auth/signout", delete(auth::signout))
        .route("/profile/mine", get(users::my_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::authenticate,
        ));

    let author = Router::new()
        .route(
            "/author/blog",
            post(author::create_draft).put(author::update_blog),
        )
        .route(
            "/author/blog/id/:id",
            get(author::blog_by_id).delete(author::delete_blog),
        )
        .route("/author/blog/submit/:id", put(author::submit))
        .route("/author/blog/withdraw/:id", put(author::withdraw))
        .route("/author/blogs/drafts", get(author::drafts))
        .route("/author/blogs/submitted", get(author::submitted))
        .route("/author/blogs/published", get(author::published))
        .route_layer(middleware::from_fn(|req, next| {
            gates::authorize(AUTHOR_ACCESS, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::authenticate,
        ));

    let editor = Router::new()
        .route("/editor/blog/id/:id", get(editor::blog_by_id))
        .route("/editor/blog/publish/:id", put(editor::publish))
        .route("/editor/blog/unpublish/:id", put(editor::unpublish))
        .route("/editor/blogs/submitted", get(editor::submitted))
        .route("/editor/blogs/published", get(editor::published))
        .route_layer(middleware::from_fn(|req, next| {
            gates::authorize(EDITOR_ACCESS, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::authenticate,
        ));

    let gated = public
        .merge(authenticated)
        .merge(author)
        .merge(editor)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gates::api_key_gate,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(gated)
        .with_state(state)
}
