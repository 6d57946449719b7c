use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author attributes copied onto a post, comment, or reply at creation
/// time. Deliberately a snapshot, not a reference: later profile edits in
/// the identity service do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Post entity as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by_id: Option<Uuid>,
    pub deleted_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn author(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.author_id,
            name: self.author_name.clone(),
            email: self.author_email.clone(),
            avatar: self.author_avatar.clone(),
        }
    }
}

/// Comment entity as stored. Carries a back-reference to its post; the
/// post itself holds no comment list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn author(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.author_id,
            name: self.author_name.clone(),
            email: self.author_email.clone(),
            avatar: self.author_avatar.clone(),
        }
    }
}

/// Reply entity as stored. `seq` records append order.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reply {
    pub seq: i64,
    pub id: Uuid,
    pub comment_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn author(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.author_id,
            name: self.author_name.clone(),
            email: self.author_email.clone(),
            avatar: self.author_avatar.clone(),
        }
    }
}

/// Liker summary populated from the identity mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LikerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Reply as returned to clients. Does not repeat the parent comment id;
/// callers that need the linkage already hold it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: Uuid,
    pub content: String,
    pub author: AuthorSnapshot,
    pub created_at: DateTime<Utc>,
}

/// Comment populated with likes, and with replies where the operation
/// includes them (single-post fetch and comment listing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author: AuthorSnapshot,
    pub likes: Vec<LikerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ReplyView>>,
    pub created_at: DateTime<Utc>,
}

/// Post populated with liker summaries and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub author: AuthorSnapshot,
    pub likes: Vec<LikerSummary>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pagination metadata. Field names are part of the public API contract
/// shared with the frontend, hence camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub page_size: i64,
    pub pages: i64,
    pub total: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            current_page: page,
            page_size: limit,
            pages,
            total,
        }
    }
}

/// Response envelope combining a result page with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_rounds_up() {
        let meta = PageMeta::new(1, 5, 11);
        assert_eq!(meta.pages, 3);
        assert_eq!(meta.total, 11);

        let meta = PageMeta::new(2, 5, 10);
        assert_eq!(meta.pages, 2);
        assert_eq!(meta.current_page, 2);
    }

    #[test]
    fn test_page_meta_empty_set() {
        let meta = PageMeta::new(1, 10, 0);
        assert_eq!(meta.pages, 0);
        assert_eq!(meta.total, 0);
    }

    #[test]
    fn test_page_meta_serializes_camel_case() {
        let meta = PageMeta::new(1, 5, 7);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 5);
        assert_eq!(json["pages"], 2);
        assert_eq!(json["total"], 7);
    }

    #[test]
    fn test_author_snapshot_from_post() {
        let author_id = Uuid::new_v4();
        let post = Post {
            id: Uuid::new_v4(),
            content: "hello".to_string(),
            images: vec![],
            tags: vec!["hiring".to_string()],
            author_id,
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
            author_avatar: None,
            is_deleted: false,
            deleted_at: None,
            deleted_by_id: None,
            deleted_by_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let author = post.author();
        assert_eq!(author.id, author_id);
        assert_eq!(author.name, "Ada");
        assert_eq!(author.avatar, None);
    }
}
