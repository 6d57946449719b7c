//! Comment handlers - HTTP endpoints for comments and replies
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::handlers::posts::{parse_id, PageQuery};
use crate::middleware::Actor;
use crate::services::CommentService;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

/// Create a comment under a post
/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .create_comment(post_id, &actor.snapshot(), &req.content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Comments for a post, oldest first
/// GET /api/v1/posts/{id}/comments?page&limit
pub async fn list_comments(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    let envelope = service
        .list_comments(post_id, query.page, query.limit)
        .await?;

    Ok(HttpResponse::Ok().json(envelope))
}

/// Edit a comment (author only)
/// PATCH /api/v1/comments/{id}
pub async fn update_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    let comment = service
        .update_comment(comment_id, &actor.snapshot(), &req.content)
        .await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment (author only, physical)
/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    service.delete_comment(comment_id, &actor.snapshot()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Toggle the caller's like on a comment
/// POST /api/v1/comments/{id}/like
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    let comment = service.toggle_like(comment_id, actor.id).await?;

    Ok(HttpResponse::Ok().json(comment))
}

/// Append a reply to a comment
/// POST /api/v1/comments/{id}/reply
pub async fn reply_to_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
    req: web::Json<CommentBody>,
) -> Result<HttpResponse> {
    let comment_id = parse_id(&path.into_inner())?;

    let service = CommentService::new((**pool).clone());
    let reply = service
        .reply_to_comment(comment_id, &actor.snapshot(), &req.content)
        .await?;

    Ok(HttpResponse::Created().json(reply))
}
