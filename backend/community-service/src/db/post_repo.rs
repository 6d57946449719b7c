use crate::models::{AuthorSnapshot, LikerSummary, Post};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Create a new post with an author snapshot taken from the actor
pub async fn create_post(
    pool: &PgPool,
    author: &AuthorSnapshot,
    content: &str,
    images: &[String],
    tags: &[String],
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (content, images, tags, author_id, author_name, author_email, author_avatar)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, content, images, tags, author_id, author_name, author_email, author_avatar,
                  is_deleted, deleted_at, deleted_by_id, deleted_by_name, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(images)
    .bind(tags)
    .bind(author.id)
    .bind(&author.name)
    .bind(&author.email)
    .bind(&author.avatar)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID (excluding soft-deleted posts)
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, images, tags, author_id, author_name, author_email, author_avatar,
               is_deleted, deleted_at, deleted_by_id, deleted_by_name, created_at, updated_at
        FROM posts
        WHERE id = $1 AND is_deleted = FALSE
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List non-deleted posts, newest first. The id tiebreak keeps pages
/// stable when two posts share a creation timestamp.
pub async fn list_posts(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, images, tags, author_id, author_name, author_email, author_avatar,
               is_deleted, deleted_at, deleted_by_id, deleted_by_name, created_at, updated_at
        FROM posts
        WHERE is_deleted = FALSE
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count non-deleted posts
pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE is_deleted = FALSE")
            .fetch_one(pool)
            .await?;

    Ok(count)
}

/// Apply a partial patch to a post. Absent fields keep their stored value.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    content: Option<&str>,
    images: Option<&[String]>,
    tags: Option<&[String]>,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET content = COALESCE($2, content),
            images = COALESCE($3, images),
            tags = COALESCE($4, tags),
            updated_at = NOW()
        WHERE id = $1 AND is_deleted = FALSE
        RETURNING id, content, images, tags, author_id, author_name, author_email, author_avatar,
                  is_deleted, deleted_at, deleted_by_id, deleted_by_name, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(content)
    .bind(images)
    .bind(tags)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Soft delete a post, recording who removed it. The row and its comments
/// stay in storage; reads simply stop seeing them.
pub async fn soft_delete_post(
    pool: &PgPool,
    post_id: Uuid,
    deleted_by_id: Uuid,
    deleted_by_name: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET is_deleted = TRUE,
            deleted_at = NOW(),
            deleted_by_id = $2,
            deleted_by_name = $3,
            updated_at = NOW()
        WHERE id = $1 AND is_deleted = FALSE
        "#,
    )
    .bind(post_id)
    .bind(deleted_by_id)
    .bind(deleted_by_name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Toggle a like as one conditional statement: remove the membership row
/// if present, insert it otherwise. Concurrent togglers cannot lose each
/// other's updates the way a fetch-mutate-store of a likes array can.
/// Returns true when the post is liked after the call.
pub async fn toggle_like(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let liked: bool = sqlx::query_scalar(
        r#"
        WITH removed AS (
            DELETE FROM post_likes
            WHERE post_id = $1 AND user_id = $2
            RETURNING user_id
        ),
        added AS (
            INSERT INTO post_likes (post_id, user_id)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM removed)
            ON CONFLICT (post_id, user_id) DO NOTHING
            RETURNING user_id
        )
        SELECT EXISTS (SELECT 1 FROM added)
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(liked)
}

#[derive(sqlx::FromRow)]
struct PostLikerRow {
    post_id: Uuid,
    id: Uuid,
    name: String,
    email: String,
    avatar: Option<String>,
}

/// Liker summaries for a page of posts, grouped by post
pub async fn likers_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<LikerSummary>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, PostLikerRow>(
        r#"
        SELECT pl.post_id, u.id, u.name, u.email, u.avatar
        FROM post_likes pl
        JOIN users u ON u.id = pl.user_id
        WHERE pl.post_id = ANY($1)
        ORDER BY pl.post_id, pl.created_at ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<LikerSummary>> = HashMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(LikerSummary {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
        });
    }

    Ok(grouped)
}
