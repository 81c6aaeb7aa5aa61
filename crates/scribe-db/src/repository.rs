//! Store traits and shared repository types
//!
//! The traits are the seams between the request-serving layers and the
//! database: services and handlers depend on these, the repositories in
//! this crate implement them over a `PgPool`, and tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use uuid::Uuid;

use scribe_core::pagination::PaginationParams;
use scribe_models::{ApiKey, Blog, BlogSummary, Keystore, Message, Role, RoleCode, User};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Row decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Session (keystore) persistence.
///
/// A row binds an access token jti (`primary_key`) and its paired
/// refresh token jti (`secondary_key`) to a user. Rotation is always
/// delete-old/insert-new, never an in-place update.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a session row. Both keys must be caller-generated
    /// high-entropy random strings.
    async fn create(
        &self,
        user_id: Uuid,
        primary_key: &str,
        secondary_key: &str,
    ) -> RepositoryResult<Keystore>;

    /// Active session matching user and access-token jti. `None` means
    /// the pair has been revoked; this is the sole revocation check.
    async fn find_active(
        &self,
        user_id: Uuid,
        primary_key: &str,
    ) -> RepositoryResult<Option<Keystore>>;

    /// Active session matching both jtis, requiring proof of possession
    /// of the access and the refresh token. Used only during refresh.
    async fn find_for_refresh(
        &self,
        user_id: Uuid,
        primary_key: &str,
        secondary_key: &str,
    ) -> RepositoryResult<Option<Keystore>>;

    /// Hard-delete a row. Returns whether a row was affected; zero rows
    /// is authoritative proof another caller won the race for it.
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// API key registry. Only the lookup is on the hot path; creation and
/// deletion exist for tests and bootstrap fixtures.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    async fn find_active_by_key(&self, key: &str) -> RepositoryResult<Option<ApiKey>>;

    async fn create_key(
        &self,
        key: &str,
        version: i32,
        permissions: &[String],
        comments: &[String],
    ) -> RepositoryResult<ApiKey>;

    async fn delete_key(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// Parameters for creating a user together with its role links.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub profile_pic_url: Option<String>,
    pub roles: Vec<Role>,
}

/// User directory: lookups used by the gates and the auth handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// User with roles joined, or `None`.
    async fn fetch_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn fetch_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> RepositoryResult<bool>;

    /// Insert the user and its role links in one transaction.
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User>;

    async fn fetch_role_by_code(&self, code: RoleCode) -> RepositoryResult<Option<Role>>;

    // Test/bootstrap fixtures
    async fn create_role(&self, code: RoleCode) -> RepositoryResult<Role>;
    async fn delete_role(&self, id: Uuid) -> RepositoryResult<bool>;
    async fn remove_by_email(&self, email: &str) -> RepositoryResult<bool>;
}

/// Parameters for creating a blog draft.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub draft_text: String,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub img_url: Option<String>,
    pub slug: String,
}

/// Partial update of an author's own blog. `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub draft_text: Option<String>,
    pub tags: Option<Vec<String>>,
    pub img_url: Option<String>,
    pub slug: Option<String>,
}

/// Blog persistence for the public read surface and the author/editor
/// workflows.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn find_published_by_id(&self, id: Uuid) -> RepositoryResult<Option<Blog>>;

    async fn find_published_by_slug(&self, slug: &str) -> RepositoryResult<Option<Blog>>;

    async fn latest(&self, pagination: PaginationParams) -> RepositoryResult<Vec<BlogSummary>>;

    async fn tagged(
        &self,
        tag: &str,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    /// The author's own blog in any workflow state, or `None` when the
    /// blog does not exist or belongs to someone else.
    async fn find_for_author(&self, id: Uuid, author_id: Uuid) -> RepositoryResult<Option<Blog>>;

    /// Any live blog regardless of workflow state. Editor-only lookup.
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Blog>>;

    async fn slug_exists(&self, slug: &str) -> RepositoryResult<bool>;

    async fn create_draft(&self, new_blog: NewBlog) -> RepositoryResult<Blog>;

    /// Apply a partial update to the author's own blog and return the
    /// updated row, or `None` when no matching row belongs to the
    /// author.
    async fn update_blog(
        &self,
        id: Uuid,
        author_id: Uuid,
        patch: BlogPatch,
    ) -> RepositoryResult<Option<Blog>>;

    /// Soft-delete the author's own blog. Returns false when no
    /// matching row belongs to the author.
    async fn delete_blog(&self, id: Uuid, author_id: Uuid) -> RepositoryResult<bool>;

    async fn drafts_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    async fn submitted_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    async fn published_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    /// Everything awaiting editorial review, across all authors.
    async fn all_submitted(
        &self,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    async fn all_published(
        &self,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>>;

    /// Flip the submitted flag on the author's own draft. Returns false
    /// when no matching row belongs to the author.
    async fn set_submitted(
        &self,
        id: Uuid,
        author_id: Uuid,
        submitted: bool,
    ) -> RepositoryResult<bool>;

    /// Publish a submitted blog, copying the draft text live.
    async fn publish(&self, id: Uuid) -> RepositoryResult<bool>;

    async fn unpublish(&self, id: Uuid) -> RepositoryResult<bool>;
}

/// Contact message persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_message(&self, kind: &str, msg: &str) -> RepositoryResult<Message>;
}
