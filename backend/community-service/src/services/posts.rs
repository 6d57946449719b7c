//! Post service - creation, feed listing, author-only mutation, and like
//! toggling for top-level posts
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::models::{AuthorSnapshot, PageMeta, Paginated, PostView};
use crate::services::feed;

/// Largest page a single request may ask for
pub const MAX_PAGE_SIZE: i64 = 100;
/// Page size used when the client does not send one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Partial update for a post; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

pub(crate) fn normalize_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Offset for a 1-indexed page. Saturates so an absurd page number from
/// the query string stays a valid (empty) slice instead of overflowing.
pub(crate) fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

#[derive(Clone)]
pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post with the author snapshotted from the actor
    pub async fn create_post(
        &self,
        actor: &AuthorSnapshot,
        content: &str,
        images: Vec<String>,
        tags: Vec<String>,
    ) -> Result<PostView> {
        if content.trim().is_empty() {
            return Err(AppError::InvalidArgument("content is required".into()));
        }

        let post = post_repo::create_post(&self.pool, actor, content, &images, &tags).await?;
        tracing::info!(post_id = %post.id, author_id = %actor.id, "post created");

        let mut views = feed::populate_posts(&self.pool, vec![post], true).await?;
        Ok(views.remove(0))
    }

    /// Paginated feed of non-deleted posts, newest first
    pub async fn list_posts(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Paginated<PostView>> {
        let (page, limit) = normalize_page(page, limit);
        let offset = page_offset(page, limit);

        let (total, posts) = tokio::try_join!(
            post_repo::count_posts(&self.pool),
            post_repo::list_posts(&self.pool, limit, offset)
        )?;

        let result = feed::populate_posts(&self.pool, posts, false).await?;

        Ok(Paginated {
            meta: PageMeta::new(page, limit, total),
            result,
        })
    }

    /// Single post with comments and replies populated
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostView> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        let mut views = feed::populate_posts(&self.pool, vec![post], true).await?;
        Ok(views.remove(0))
    }

    /// Apply a partial patch. Only the author may edit their post.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        actor: &AuthorSnapshot,
        patch: PostPatch,
    ) -> Result<PostView> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        if post.author_id != actor.id {
            return Err(AppError::Forbidden(
                "only the author can edit this post".into(),
            ));
        }

        if let Some(content) = &patch.content {
            if content.trim().is_empty() {
                return Err(AppError::InvalidArgument("content cannot be empty".into()));
            }
        }

        let updated = post_repo::update_post(
            &self.pool,
            post_id,
            patch.content.as_deref(),
            patch.images.as_deref(),
            patch.tags.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        let mut views = feed::populate_posts(&self.pool, vec![updated], true).await?;
        Ok(views.remove(0))
    }

    /// Soft delete. Only the author may remove their post; comments are
    /// not cascaded, they simply become unreachable through post reads.
    pub async fn remove_post(&self, post_id: Uuid, actor: &AuthorSnapshot) -> Result<()> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        if post.author_id != actor.id {
            return Err(AppError::Forbidden(
                "only the author can remove this post".into(),
            ));
        }

        let removed =
            post_repo::soft_delete_post(&self.pool, post_id, actor.id, &actor.name).await?;
        if !removed {
            return Err(AppError::NotFound(format!("post {post_id}")));
        }

        tracing::info!(post_id = %post_id, deleted_by = %actor.id, "post soft-deleted");
        Ok(())
    }

    /// Toggle the actor's like and return the re-populated post
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<PostView> {
        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        let liked = post_repo::toggle_like(&self.pool, post_id, user_id).await?;
        tracing::debug!(post_id = %post_id, user_id = %user_id, liked, "post like toggled");

        self.get_post(post_id).await
    }
}
