//! Community Service Library
//!
//! Handles the social area of the job platform: forum posts, comments,
//! nested replies, like toggling, and paginated feed assembly. Identity
//! (the authenticated actor) is supplied by the upstream gateway; user
//! and company CRUD, uploads, and AI answers live in their own services.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers for posts and comments
//! - `models`: Row types, populated view types, and the page envelope
//! - `services`: Business logic layer (authorization, population)
//! - `db`: Database access layer
//! - `middleware`: Actor extraction from gateway-forwarded headers
//! - `error`: Error types and HTTP mapping
//! - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
