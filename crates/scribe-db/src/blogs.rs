//! Blog repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use scribe_core::pagination::PaginationParams;
use scribe_models::{Blog, BlogSummary};

use crate::repository::{BlogPatch, BlogStore, NewBlog, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
struct BlogRow {
    id: Uuid,
    title: String,
    description: String,
    text: Option<String>,
    draft_text: String,
    tags: Vec<String>,
    author_id: Uuid,
    img_url: Option<String>,
    slug: String,
    score: f64,
    views: i64,
    likes: i64,
    submitted: bool,
    drafted: bool,
    published: bool,
    status: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Blog {
            id: row.id,
            title: row.title,
            description: row.description,
            text: row.text,
            draft_text: row.draft_text,
            tags: row.tags,
            author_id: row.author_id,
            img_url: row.img_url,
            slug: row.slug,
            score: row.score,
            views: row.views,
            likes: row.likes,
            submitted: row.submitted,
            drafted: row.drafted,
            published: row.published,
            status: row.status,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct BlogSummaryRow {
    id: Uuid,
    title: String,
    description: String,
    slug: String,
    img_url: Option<String>,
    score: f64,
    tags: Vec<String>,
    published_at: Option<DateTime<Utc>>,
}

impl From<BlogSummaryRow> for BlogSummary {
    fn from(row: BlogSummaryRow) -> Self {
        BlogSummary {
            id: row.id,
            title: row.title,
            description: row.description,
            slug: row.slug,
            img_url: row.img_url,
            score: row.score,
            tags: row.tags,
            published_at: row.published_at,
        }
    }
}

const BLOG_COLUMNS: &str = "id, title, description, text, draft_text, tags, author_id, img_url, \
     slug, score, views, likes, submitted, drafted, published, status, \
     published_at, created_at, updated_at";

/// Blog repository implementation
pub struct BlogRepository {
    pool: PgPool,
}

const SUMMARY_COLUMNS: &str = "id, title, description, slug, img_url, score, tags, published_at";

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn author_summaries(
        &self,
        flag: &str,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        let rows = sqlx::query_as::<_, BlogSummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM blogs
            WHERE status = TRUE
              AND {flag} = TRUE
              AND author_id = $1
            ORDER BY updated_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn summaries(
        &self,
        flag: &str,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        let rows = sqlx::query_as::<_, BlogSummaryRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM blogs
            WHERE status = TRUE
              AND {flag} = TRUE
            ORDER BY updated_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BlogStore for BlogRepository {
    async fn find_published_by_id(&self, id: Uuid) -> RepositoryResult<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1 AND published = TRUE AND status = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_published_by_slug(&self, slug: &str) -> RepositoryResult<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1 AND published = TRUE AND status = TRUE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn latest(&self, pagination: PaginationParams) -> RepositoryResult<Vec<BlogSummary>> {
        let rows = sqlx::query_as::<_, BlogSummaryRow>(
            r#"
            SELECT id, title, description, slug, img_url, score, tags, published_at
            FROM blogs
            WHERE status = TRUE
              AND published = TRUE
            ORDER BY published_at DESC, score DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn tagged(
        &self,
        tag: &str,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        let rows = sqlx::query_as::<_, BlogSummaryRow>(
            r#"
            SELECT id, title, description, slug, img_url, score, tags, published_at
            FROM blogs
            WHERE status = TRUE
              AND published = TRUE
              AND $1 = ANY(tags)
            ORDER BY published_at DESC, score DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(tag)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_for_author(&self, id: Uuid, author_id: Uuid) -> RepositoryResult<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1 AND author_id = $2 AND status = TRUE"
        ))
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1 AND status = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn slug_exists(&self, slug: &str) -> RepositoryResult<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM blogs WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    async fn create_draft(&self, new_blog: NewBlog) -> RepositoryResult<Blog> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            INSERT INTO blogs (title, description, draft_text, tags, author_id, img_url, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(&new_blog.title)
        .bind(&new_blog.description)
        .bind(&new_blog.draft_text)
        .bind(&new_blog.tags)
        .bind(new_blog.author_id)
        .bind(&new_blog.img_url)
        .bind(&new_blog.slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_blog(
        &self,
        id: Uuid,
        author_id: Uuid,
        patch: BlogPatch,
    ) -> RepositoryResult<Option<Blog>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            UPDATE blogs
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                draft_text = COALESCE($5, draft_text),
                tags = COALESCE($6, tags),
                img_url = COALESCE($7, img_url),
                slug = COALESCE($8, slug),
                updated_at = NOW()
            WHERE id = $1
              AND author_id = $2
              AND status = TRUE
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(author_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.draft_text)
        .bind(&patch.tags)
        .bind(&patch.img_url)
        .bind(&patch.slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_blog(&self, id: Uuid, author_id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET status = FALSE, updated_at = NOW()
            WHERE id = $1
              AND author_id = $2
              AND status = TRUE
            "#,
        )
        .bind(id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn drafts_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        self.author_summaries("drafted", author_id, pagination).await
    }

    async fn submitted_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        self.author_summaries("submitted", author_id, pagination)
            .await
    }

    async fn published_for_author(
        &self,
        author_id: Uuid,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        self.author_summaries("published", author_id, pagination)
            .await
    }

    async fn all_submitted(
        &self,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        self.summaries("submitted", pagination).await
    }

    async fn all_published(
        &self,
        pagination: PaginationParams,
    ) -> RepositoryResult<Vec<BlogSummary>> {
        self.summaries("published", pagination).await
    }

    async fn set_submitted(
        &self,
        id: Uuid,
        author_id: Uuid,
        submitted: bool,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET submitted = $3, drafted = NOT $3, updated_at = NOW()
            WHERE id = $1
              AND author_id = $2
              AND published = FALSE
              AND status = TRUE
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(submitted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn publish(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET published = TRUE,
                submitted = FALSE,
                drafted = FALSE,
                text = draft_text,
                published_at = COALESCE(published_at, NOW()),
                updated_at = NOW()
            WHERE id = $1
              AND submitted = TRUE
              AND status = TRUE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unpublish(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET published = FALSE, drafted = TRUE, updated_at = NOW()
            WHERE id = $1
              AND published = TRUE
              AND status = TRUE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
