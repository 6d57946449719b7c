//! Route configuration
//!
//! Centralized route setup; each domain manages its own scope.
use actix_web::web;

use crate::handlers;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::health_check))
        .route(
            "/health/ready",
            web::get().to(handlers::health::readiness_check),
        )
        .service(
            web::scope("/api/v1")
                .configure(posts)
                .configure(comments),
        );
}

fn posts(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::post().to(handlers::posts::create_post))
            .route("", web::get().to(handlers::posts::list_posts))
            .route("/{id}", web::get().to(handlers::posts::get_post))
            .route("/{id}", web::patch().to(handlers::posts::update_post))
            .route("/{id}", web::delete().to(handlers::posts::delete_post))
            .route("/{id}/like", web::post().to(handlers::posts::toggle_like))
            .route(
                "/{id}/comments",
                web::post().to(handlers::comments::create_comment),
            )
            .route(
                "/{id}/comments",
                web::get().to(handlers::comments::list_comments),
            ),
    );
}

fn comments(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("/{id}", web::patch().to(handlers::comments::update_comment))
            .route(
                "/{id}",
                web::delete().to(handlers::comments::delete_comment),
            )
            .route("/{id}/like", web::post().to(handlers::comments::toggle_like))
            .route(
                "/{id}/reply",
                web::post().to(handlers::comments::reply_to_comment),
            ),
    );
}
