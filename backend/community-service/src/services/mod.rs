//! Business logic layer
//!
//! Services own validation, author-only authorization, and the population
//! of stored rows into API views. Storage enforces nothing beyond its
//! constraints; callers must come through here.
pub mod comments;
pub mod feed;
pub mod posts;

pub use comments::CommentService;
pub use posts::{PostPatch, PostService};
