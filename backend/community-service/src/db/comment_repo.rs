use crate::models::{AuthorSnapshot, Comment, LikerSummary, Reply};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Create a new comment under a post. The post is linked purely by this
/// back-reference; nothing on the post row needs a second write.
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author: &AuthorSnapshot,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, content, author_id, author_name, author_email, author_avatar)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, post_id, content, author_id, author_name, author_email, author_avatar,
                  created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(content)
    .bind(author.id)
    .bind(&author.name)
    .bind(&author.email)
    .bind(&author.avatar)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Find a comment by ID
pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, content, author_id, author_name, author_email, author_avatar,
               created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Comments for a post in creation order, oldest first. Feed clients
/// append new comments at the bottom, so ascending matches what they show.
pub async fn list_comments(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, content, author_id, author_name, author_email, author_avatar,
               created_at, updated_at
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at ASC, id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Count comments for a post
pub async fn count_comments(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Comments for a page of posts, grouped by post in creation order
pub async fn comments_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Comment>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, content, author_id, author_name, author_email, author_avatar,
               created_at, updated_at
        FROM comments
        WHERE post_id = ANY($1)
        ORDER BY post_id, created_at ASC, id ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.post_id).or_default().push(comment);
    }

    Ok(grouped)
}

/// Update comment content
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, post_id, content, author_id, author_name, author_email, author_avatar,
                  created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Physically delete a comment. Unlike posts, comments carry no
/// soft-delete flag; likes and replies go with the row.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Toggle a like on a comment. Same conditional single-statement shape as
/// the post toggle. Returns true when the comment is liked after the call.
pub async fn toggle_like(
    pool: &PgPool,
    comment_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let liked: bool = sqlx::query_scalar(
        r#"
        WITH removed AS (
            DELETE FROM comment_likes
            WHERE comment_id = $1 AND user_id = $2
            RETURNING user_id
        ),
        added AS (
            INSERT INTO comment_likes (comment_id, user_id)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM removed)
            ON CONFLICT (comment_id, user_id) DO NOTHING
            RETURNING user_id
        )
        SELECT EXISTS (SELECT 1 FROM added)
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(liked)
}

#[derive(sqlx::FromRow)]
struct CommentLikerRow {
    comment_id: Uuid,
    id: Uuid,
    name: String,
    email: String,
    avatar: Option<String>,
}

/// Liker summaries for a set of comments, grouped by comment
pub async fn likers_for_comments(
    pool: &PgPool,
    comment_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<LikerSummary>>, sqlx::Error> {
    if comment_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, CommentLikerRow>(
        r#"
        SELECT cl.comment_id, u.id, u.name, u.email, u.avatar
        FROM comment_likes cl
        JOIN users u ON u.id = cl.user_id
        WHERE cl.comment_id = ANY($1)
        ORDER BY cl.comment_id, cl.created_at ASC
        "#,
    )
    .bind(comment_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<LikerSummary>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.comment_id)
            .or_default()
            .push(LikerSummary {
                id: row.id,
                name: row.name,
                email: row.email,
                avatar: row.avatar,
            });
    }

    Ok(grouped)
}

/// Append a reply to a comment. Replies are immutable once created.
pub async fn create_reply(
    pool: &PgPool,
    comment_id: Uuid,
    author: &AuthorSnapshot,
    content: &str,
) -> Result<Reply, sqlx::Error> {
    let reply = sqlx::query_as::<_, Reply>(
        r#"
        INSERT INTO comment_replies (comment_id, content, author_id, author_name, author_email, author_avatar)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING seq, id, comment_id, content, author_id, author_name, author_email, author_avatar,
                  created_at
        "#,
    )
    .bind(comment_id)
    .bind(content)
    .bind(author.id)
    .bind(&author.name)
    .bind(&author.email)
    .bind(&author.avatar)
    .fetch_one(pool)
    .await?;

    Ok(reply)
}

/// Replies for a set of comments, grouped by comment in append order
pub async fn replies_for_comments(
    pool: &PgPool,
    comment_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Reply>>, sqlx::Error> {
    if comment_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let replies = sqlx::query_as::<_, Reply>(
        r#"
        SELECT seq, id, comment_id, content, author_id, author_name, author_email, author_avatar,
               created_at
        FROM comment_replies
        WHERE comment_id = ANY($1)
        ORDER BY comment_id, seq ASC
        "#,
    )
    .bind(comment_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<Reply>> = HashMap::new();
    for reply in replies {
        grouped.entry(reply.comment_id).or_default().push(reply);
    }

    Ok(grouped)
}
