//! Database access layer
//!
//! Plain query functions over the connection pool. Authorization and
//! population live a layer up in `services`; everything here is a single
//! statement and relies on the database's per-statement atomicity.
pub mod comment_repo;
pub mod post_repo;
