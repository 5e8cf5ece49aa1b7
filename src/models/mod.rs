mod post;
mod user;

pub use post::{NewPost, Post, PostChanges, PostStatus};
pub use user::User;
