mod blog;
mod editor;
mod health;
mod user;

use crate::states::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub use blog::{post_detail, post_list, post_share_form, post_share_submit};
pub use health::health_check;

/// Public blog pages.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(post_list))
        .route("/{year}/{month}/{day}/{slug}/", get(post_detail))
        .route("/{post_id}/share/", get(post_share_form).post(post_share_submit))
}

/// Account and post management for authors. Everything except signup and
/// login needs a bearer token.
pub fn editor_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(user::signup))
        .route("/auth/login", post(user::login))
        .route(
            "/users/me",
            get(user::get_current_user).delete(user::delete_current_user),
        )
        .route("/api/posts", post(editor::create_post).get(editor::list_posts))
        .route(
            "/api/posts/{id}",
            get(editor::get_post)
                .patch(editor::update_post)
                .delete(editor::delete_post),
        )
}
