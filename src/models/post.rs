use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Publication state of a post. Stored as the two-letter codes `DF` / `PB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "DF")]
    Draft,
    #[serde(rename = "PB")]
    Published,
}

impl PostStatus {
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Draft => "Draft",
            PostStatus::Published => "Published",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Day component of the `(publish date, slug)` key.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical detail link: `/<year>/<month>/<day>/<slug>/`.
    pub fn absolute_url(&self) -> String {
        format!(
            "/{}/{}/{}/{}/",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Fields accepted when inserting a post. Everything the store fills in on its
/// own (`id`, `created`, `updated`) is absent.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: Option<String>,
    pub author_id: Uuid,
    pub body: String,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, author_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            author_id,
            body: body.into(),
            publish: None,
            status: None,
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: Option<String>,
    pub publish: Option<DateTime<Utc>>,
    pub status: Option<PostStatus>,
}
