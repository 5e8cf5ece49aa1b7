use crate::models::{Post, PostStatus, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted_posts: usize,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author: Uuid,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
    pub url: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        let url = post.absolute_url();
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            author: post.author_id,
            body: post.body,
            publish: post.publish,
            created: post.created,
            updated: post.updated,
            status: post.status,
            url,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub num_pages: usize,
    pub limit: usize,
    pub total: usize,
}
