//! Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::Actor;
use crate::services::{PostPatch, PostService};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Pagination query parameters (1-indexed page)
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Identifiers are opaque UUIDs; anything else is rejected before a
/// storage call is made.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidArgument(format!("malformed identifier: {raw}")))
}

/// Create a new post
/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let req = req.into_inner();

    let post = service
        .create_post(
            &actor.snapshot(),
            &req.content,
            req.images.unwrap_or_default(),
            req.tags.unwrap_or_default(),
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Paginated feed listing
/// GET /api/v1/posts?page&limit
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let envelope = service.list_posts(query.page, query.limit).await?;

    Ok(HttpResponse::Ok().json(envelope))
}

/// Get a single post with comments and replies
/// GET /api/v1/posts/{id}
pub async fn get_post(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;

    let service = PostService::new((**pool).clone());
    let post = service.get_post(post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Patch a post (author only)
/// PATCH /api/v1/posts/{id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;
    let req = req.into_inner();

    let service = PostService::new((**pool).clone());
    let post = service
        .update_post(
            post_id,
            &actor.snapshot(),
            PostPatch {
                content: req.content,
                images: req.images,
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Soft delete a post (author only)
/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;

    let service = PostService::new((**pool).clone());
    service.remove_post(post_id, &actor.snapshot()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Toggle the caller's like on a post
/// POST /api/v1/posts/{id}/like
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&path.into_inner())?;

    let service = PostService::new((**pool).clone());
    let post = service.toggle_like(post_id, actor.id).await?;

    Ok(HttpResponse::Ok().json(post))
}
