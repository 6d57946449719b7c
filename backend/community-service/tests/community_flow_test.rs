//! End-to-end service tests against a real Postgres instance.
//!
//! These are `#[ignore]`d because they need DATABASE_URL pointing at a
//! disposable database; run them with `cargo test -- --ignored`.
mod common;

use common::fixtures;
use community_service::error::AppError;
use community_service::services::{CommentService, PostPatch, PostService};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_like_toggle_is_involution() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let liker = fixtures::create_test_user(&pool, "Grace").await;
    let service = PostService::new(pool.clone());

    let post = service
        .create_post(&author, "toggle me", vec![], vec![])
        .await
        .unwrap();
    assert!(post.likes.is_empty());

    let liked = service.toggle_like(post.id, liker.id).await.unwrap();
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].id, liker.id);
    assert_eq!(liked.likes[0].name, "Grace");

    // Toggling again from the same user restores the original state.
    let unliked = service.toggle_like(post.id, liker.id).await.unwrap();
    assert!(unliked.likes.is_empty());

    let liked_again = service.toggle_like(post.id, liker.id).await.unwrap();
    assert_eq!(liked_again.likes.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_soft_deleted_post_is_invisible() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let service = PostService::new(pool.clone());

    let post = service
        .create_post(&author, "ephemeral", vec![], vec![])
        .await
        .unwrap();
    service.remove_post(post.id, &author).await.unwrap();

    // Reads, mutations, and likes all treat the post as gone.
    assert!(matches!(
        service.get_post(post.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.toggle_like(post.id, author.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update_post(post.id, &author, PostPatch::default())
            .await,
        Err(AppError::NotFound(_))
    ));

    let feed = service.list_posts(None, None).await.unwrap();
    assert_eq!(feed.meta.total, 0);
    assert!(feed.result.is_empty());

    // The row survives for audit; only reads are filtered.
    let raw: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE id = $1 AND is_deleted = TRUE")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(raw, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_only_author_may_mutate() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let intruder = fixtures::create_test_user(&pool, "Mallory").await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    let post = posts
        .create_post(&author, "mine", vec![], vec![])
        .await
        .unwrap();

    let patch = PostPatch {
        content: Some("hijacked".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        posts.update_post(post.id, &intruder, patch).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        posts.remove_post(post.id, &intruder).await,
        Err(AppError::Forbidden(_))
    ));

    let comment = comments
        .create_comment(post.id, &author, "also mine")
        .await
        .unwrap();
    assert!(matches!(
        comments.update_comment(comment.id, &intruder, "hijacked").await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        comments.delete_comment(comment.id, &intruder).await,
        Err(AppError::Forbidden(_))
    ));

    // The author still can.
    let updated = posts
        .update_post(
            post.id,
            &author,
            PostPatch {
                content: Some("edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.content, "edited");
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_feed_pagination_is_stable_and_disjoint() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let service = PostService::new(pool.clone());

    for i in 0..7 {
        service
            .create_post(&author, &format!("post {i}"), vec![], vec![])
            .await
            .unwrap();
    }

    let page1 = service.list_posts(Some(1), Some(3)).await.unwrap();
    let page2 = service.list_posts(Some(2), Some(3)).await.unwrap();
    let page3 = service.list_posts(Some(3), Some(3)).await.unwrap();

    assert_eq!(page1.meta.total, 7);
    assert_eq!(page1.meta.pages, 3);
    assert_eq!(page1.result.len(), 3);
    assert_eq!(page2.result.len(), 3);
    assert_eq!(page3.result.len(), 1);

    let mut seen: Vec<Uuid> = page1
        .result
        .iter()
        .chain(&page2.result)
        .chain(&page3.result)
        .map(|p| p.id)
        .collect();
    let len_before = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), len_before, "pages must not overlap");

    // Re-reading the same page yields the same slice in the same order.
    let page1_again = service.list_posts(Some(1), Some(3)).await.unwrap();
    let ids: Vec<Uuid> = page1.result.iter().map(|p| p.id).collect();
    let ids_again: Vec<Uuid> = page1_again.result.iter().map(|p| p.id).collect();
    assert_eq!(ids, ids_again);

    // A page past the end is empty, not an error.
    let beyond = service.list_posts(Some(9), Some(3)).await.unwrap();
    assert!(beyond.result.is_empty());
    assert_eq!(beyond.meta.total, 7);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_replies_keep_append_order() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    let post = posts
        .create_post(&author, "thread root", vec![], vec![])
        .await
        .unwrap();
    let comment = comments
        .create_comment(post.id, &author, "first")
        .await
        .unwrap();

    for text in ["reply a", "reply b", "reply c"] {
        comments
            .reply_to_comment(comment.id, &author, text)
            .await
            .unwrap();
    }

    let full = posts.get_post(post.id).await.unwrap();
    assert_eq!(full.comments.len(), 1);
    let replies = full.comments[0].replies.as_ref().unwrap();
    let texts: Vec<&str> = replies.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(texts, vec!["reply a", "reply b", "reply c"]);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_comment_linkage_is_derived_from_back_reference() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let commenter = fixtures::create_test_user(&pool, "Grace").await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    let first = posts
        .create_post(&author, "first post", vec![], vec![])
        .await
        .unwrap();
    let second = posts
        .create_post(&author, "second post", vec![], vec![])
        .await
        .unwrap();

    let on_first = comments
        .create_comment(first.id, &commenter, "about the first")
        .await
        .unwrap();
    assert_eq!(on_first.post_id, first.id);
    assert_eq!(on_first.author.id, commenter.id);

    // Each post sees exactly its own comments.
    let first_full = posts.get_post(first.id).await.unwrap();
    assert_eq!(first_full.comments.len(), 1);
    assert_eq!(first_full.comments[0].id, on_first.id);

    let second_full = posts.get_post(second.id).await.unwrap();
    assert!(second_full.comments.is_empty());

    let listing = comments.list_comments(first.id, None, None).await.unwrap();
    assert_eq!(listing.meta.total, 1);
    assert_eq!(listing.result[0].id, on_first.id);

    // Deleting the comment removes it from the parent's view with no
    // second write to the post.
    comments.delete_comment(on_first.id, &commenter).await.unwrap();
    let first_after = posts.get_post(first.id).await.unwrap();
    assert!(first_after.comments.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_comment_likes_and_listing_order() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let liker = fixtures::create_test_user(&pool, "Grace").await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    let post = posts
        .create_post(&author, "discussion", vec![], vec![])
        .await
        .unwrap();

    let mut created = Vec::new();
    for text in ["one", "two", "three"] {
        created.push(
            comments
                .create_comment(post.id, &author, text)
                .await
                .unwrap(),
        );
    }

    // Oldest first, unlike the post feed.
    let listing = comments.list_comments(post.id, None, None).await.unwrap();
    let contents: Vec<&str> = listing.result.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);

    let liked = comments.toggle_like(created[0].id, liker.id).await.unwrap();
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].id, liker.id);

    let unliked = comments.toggle_like(created[0].id, liker.id).await.unwrap();
    assert!(unliked.likes.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_validation_and_missing_parents() {
    let pool = fixtures::create_test_pool().await;
    fixtures::cleanup_test_data(&pool).await;

    let author = fixtures::create_test_user(&pool, "Ada").await;
    let posts = PostService::new(pool.clone());
    let comments = CommentService::new(pool.clone());

    assert!(matches!(
        posts.create_post(&author, "   ", vec![], vec![]).await,
        Err(AppError::InvalidArgument(_))
    ));

    let ghost = Uuid::new_v4();
    assert!(matches!(
        comments.create_comment(ghost, &author, "orphan").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        comments.reply_to_comment(ghost, &author, "orphan").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        posts.get_post(ghost).await,
        Err(AppError::NotFound(_))
    ));
}
