//! Feed assembly
//!
//! Turns stored rows into the populated views the API returns, batching
//! the like, comment, and reply lookups per page instead of querying per
//! row. Pagination stays a pure function of stored state: the same
//! (page, limit) yields the same slice until a write happens.
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo};
use crate::error::Result;
use crate::models::{Comment, CommentView, LikerSummary, Post, PostView, Reply, ReplyView};

fn reply_view(reply: Reply) -> ReplyView {
    let author = reply.author();
    ReplyView {
        id: reply.id,
        content: reply.content,
        author,
        created_at: reply.created_at,
    }
}

fn comment_view(
    comment: Comment,
    likes: &mut HashMap<Uuid, Vec<LikerSummary>>,
    replies: Option<&mut HashMap<Uuid, Vec<Reply>>>,
) -> CommentView {
    let author = comment.author();
    let comment_likes = likes.remove(&comment.id).unwrap_or_default();
    let comment_replies = replies.map(|map| {
        map.remove(&comment.id)
            .unwrap_or_default()
            .into_iter()
            .map(reply_view)
            .collect()
    });

    CommentView {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        author,
        likes: comment_likes,
        replies: comment_replies,
        created_at: comment.created_at,
    }
}

/// Populate a page of posts with liker summaries and comments. Replies
/// are attached only when `include_replies` is set (single-post fetch);
/// the feed listing leaves them out.
pub async fn populate_posts(
    pool: &PgPool,
    posts: Vec<Post>,
    include_replies: bool,
) -> Result<Vec<PostView>> {
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let mut post_likers = post_repo::likers_for_posts(pool, &post_ids).await?;
    let mut post_comments = comment_repo::comments_for_posts(pool, &post_ids).await?;

    let comment_ids: Vec<Uuid> = post_comments
        .values()
        .flatten()
        .map(|c| c.id)
        .collect();
    let mut comment_likes = comment_repo::likers_for_comments(pool, &comment_ids).await?;
    let mut replies = if include_replies {
        comment_repo::replies_for_comments(pool, &comment_ids).await?
    } else {
        HashMap::new()
    };

    let views = posts
        .into_iter()
        .map(|post| {
            let author = post.author();
            let likes = post_likers.remove(&post.id).unwrap_or_default();
            let comments = post_comments
                .remove(&post.id)
                .unwrap_or_default()
                .into_iter()
                .map(|comment| {
                    let reply_map = if include_replies {
                        Some(&mut replies)
                    } else {
                        None
                    };
                    comment_view(comment, &mut comment_likes, reply_map)
                })
                .collect();

            PostView {
                id: post.id,
                content: post.content,
                images: post.images,
                tags: post.tags,
                author,
                likes,
                comments,
                created_at: post.created_at,
                updated_at: post.updated_at,
            }
        })
        .collect();

    Ok(views)
}

/// Populate a page of comments with likes and, when requested, replies
pub async fn populate_comments(
    pool: &PgPool,
    comments: Vec<Comment>,
    include_replies: bool,
) -> Result<Vec<CommentView>> {
    let comment_ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();

    let mut likes = comment_repo::likers_for_comments(pool, &comment_ids).await?;
    let mut replies = if include_replies {
        comment_repo::replies_for_comments(pool, &comment_ids).await?
    } else {
        HashMap::new()
    };

    let views = comments
        .into_iter()
        .map(|comment| {
            let reply_map = if include_replies {
                Some(&mut replies)
            } else {
                None
            };
            comment_view(comment, &mut likes, reply_map)
        })
        .collect();

    Ok(views)
}
