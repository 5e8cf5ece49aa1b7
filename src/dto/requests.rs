use crate::{
    db::{DateRange, PostFilter},
    models::{PostChanges, PostStatus},
    slug::validate_slug,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Validate, Deserialize)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/posts`. A missing slug is derived from the title.
#[derive(Debug, Validate, Deserialize)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    #[validate(length(max = 250), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: String,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Validate, Deserialize)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 250))]
    pub title: Option<String>,
    #[validate(length(max = 250), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub body: Option<String>,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            body: req.body,
            publish: req.publish,
            status: req.status,
        }
    }
}

/// `GET /api/posts?status=PB&author=<uuid>&publish=this_month&q=rust&page=2`
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub status: Option<PostStatus>,
    pub author: Option<Uuid>,
    pub created: Option<DateRange>,
    pub publish: Option<DateRange>,
    pub q: Option<String>,
    pub page: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl PostListParams {
    pub fn filter(&self) -> PostFilter {
        PostFilter {
            status: self.status,
            author: self.author,
            created: self.created,
            publish: self.publish,
            search: self.q.clone(),
        }
    }
}
