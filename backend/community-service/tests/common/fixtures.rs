//! Shared fixtures for DB-backed integration tests
use community_service::models::AuthorSnapshot;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to the test database named by DATABASE_URL and apply
/// migrations. Panics when the variable is missing; the DB-backed tests
/// are `#[ignore]`d so the default suite never gets here.
pub async fn create_test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn cleanup_test_data(pool: &PgPool) {
    sqlx::query("TRUNCATE comment_replies, comment_likes, comments, post_likes, posts, users")
        .execute(pool)
        .await
        .expect("Failed to truncate test tables");
}

/// Insert a user into the identity mirror and return the snapshot used
/// to act as them.
pub async fn create_test_user(pool: &PgPool, name: &str) -> AuthorSnapshot {
    let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, avatar) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(Option::<String>::None)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user");

    AuthorSnapshot {
        id,
        name: name.to_string(),
        email,
        avatar: None,
    }
}
