//! In-memory tables for users and posts.

mod posts;
mod users;

pub use posts::{DateRange, PostFilter, PostStore};
pub use users::UserStore;

use crate::models::{NewPost, Post};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("slug `{slug}` is already used on {date}")]
    SlugTaken { date: NaiveDate, slug: String },
    #[error("slug cannot be empty")]
    EmptySlug,
    #[error("email is already registered")]
    EmailTaken,
    #[error("author {0} does not exist")]
    AuthorMissing(Uuid),
}

/// Both tables together, so that author deletion can cascade to posts.
#[derive(Clone, Default)]
pub struct Database {
    pub users: UserStore,
    pub posts: PostStore,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a post for an existing author.
    ///
    /// `delete_user` removes the user before cascading, so the author is
    /// checked again after the insert; a post that lost that race is removed
    /// here instead of being left behind the cascade.
    pub fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let author_id = new.author_id;
        if self.users.get(author_id).is_none() {
            return Err(StoreError::AuthorMissing(author_id));
        }
        let post = self.posts.create(new)?;
        if self.users.get(author_id).is_none() {
            let _ = self.posts.delete(post.id);
            return Err(StoreError::AuthorMissing(author_id));
        }
        Ok(post)
    }

    /// Deletes the user and every post they wrote. Returns the number of
    /// posts removed.
    pub fn delete_user(&self, id: Uuid) -> Result<usize, StoreError> {
        self.users.remove(id).ok_or(StoreError::NotFound)?;
        Ok(self.posts.delete_by_author(id))
    }
}
