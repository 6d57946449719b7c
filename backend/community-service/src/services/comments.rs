//! Comment service - creation, listing, like toggling, replies, and
//! author-only mutation, scoped to a parent post
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::models::{AuthorSnapshot, Comment, CommentView, PageMeta, Paginated, ReplyView};
use crate::services::feed;
use crate::services::posts::{normalize_page, page_offset};

#[derive(Clone)]
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn require_comment(&self, comment_id: Uuid) -> Result<Comment> {
        comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))
    }

    async fn require_post(&self, post_id: Uuid) -> Result<()> {
        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
        Ok(())
    }

    async fn populate_one(&self, comment: Comment) -> Result<CommentView> {
        let mut views = feed::populate_comments(&self.pool, vec![comment], true).await?;
        Ok(views.remove(0))
    }

    /// Create a comment under a post. The parent must exist and not be
    /// soft-deleted; the linkage is the comment's own back-reference, so
    /// this is a single write.
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        actor: &AuthorSnapshot,
        content: &str,
    ) -> Result<CommentView> {
        if content.trim().is_empty() {
            return Err(AppError::InvalidArgument("content is required".into()));
        }
        self.require_post(post_id).await?;

        let comment = comment_repo::create_comment(&self.pool, post_id, actor, content).await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");

        self.populate_one(comment).await
    }

    /// Comments for a post in creation order, oldest first
    pub async fn list_comments(
        &self,
        post_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Paginated<CommentView>> {
        self.require_post(post_id).await?;

        let (page, limit) = normalize_page(page, limit);
        let offset = page_offset(page, limit);

        let (total, comments) = tokio::try_join!(
            comment_repo::count_comments(&self.pool, post_id),
            comment_repo::list_comments(&self.pool, post_id, limit, offset)
        )?;

        let result = feed::populate_comments(&self.pool, comments, true).await?;

        Ok(Paginated {
            meta: PageMeta::new(page, limit, total),
            result,
        })
    }

    /// Toggle the actor's like and return the re-populated comment
    pub async fn toggle_like(&self, comment_id: Uuid, user_id: Uuid) -> Result<CommentView> {
        self.require_comment(comment_id).await?;

        let liked = comment_repo::toggle_like(&self.pool, comment_id, user_id).await?;
        tracing::debug!(comment_id = %comment_id, user_id = %user_id, liked, "comment like toggled");

        let comment = self.require_comment(comment_id).await?;
        self.populate_one(comment).await
    }

    /// Append a reply. The returned reply does not carry the parent id;
    /// the caller already holds it.
    pub async fn reply_to_comment(
        &self,
        comment_id: Uuid,
        actor: &AuthorSnapshot,
        content: &str,
    ) -> Result<ReplyView> {
        if content.trim().is_empty() {
            return Err(AppError::InvalidArgument("content is required".into()));
        }
        self.require_comment(comment_id).await?;

        let reply = comment_repo::create_reply(&self.pool, comment_id, actor, content).await?;
        tracing::info!(reply_id = %reply.id, comment_id = %comment_id, "reply appended");

        let author = reply.author();
        Ok(ReplyView {
            id: reply.id,
            content: reply.content,
            author,
            created_at: reply.created_at,
        })
    }

    /// Edit comment content. Only the author may edit.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        actor: &AuthorSnapshot,
        content: &str,
    ) -> Result<CommentView> {
        if content.trim().is_empty() {
            return Err(AppError::InvalidArgument("content cannot be empty".into()));
        }

        let comment = self.require_comment(comment_id).await?;
        if comment.author_id != actor.id {
            return Err(AppError::Forbidden(
                "only the author can edit this comment".into(),
            ));
        }

        let updated = comment_repo::update_comment(&self.pool, comment_id, content)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id}")))?;

        self.populate_one(updated).await
    }

    /// Delete a comment. Unlike posts this is physical: the row, its
    /// likes, and its replies are removed.
    pub async fn delete_comment(&self, comment_id: Uuid, actor: &AuthorSnapshot) -> Result<()> {
        let comment = self.require_comment(comment_id).await?;
        if comment.author_id != actor.id {
            return Err(AppError::Forbidden(
                "only the author can delete this comment".into(),
            ));
        }

        let deleted = comment_repo::delete_comment(&self.pool, comment_id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("comment {comment_id}")));
        }

        tracing::info!(comment_id = %comment_id, deleted_by = %actor.id, "comment deleted");
        Ok(())
    }
}
