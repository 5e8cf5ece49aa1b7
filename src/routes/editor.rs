use crate::{
    auth::AuthUser,
    dto::{CreatePostRequest, PaginatedResponse, PostListParams, PostResponse, UpdatePostRequest},
    errors::ApiError,
    models::{NewPost, Post},
    pagination::Paginator,
    states::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

/// POST /api/posts
/// Headers: Authorization: Bearer <token>
/// Body: { "title": "...", "body": "...", "slug"?, "publish"?, "status"? }
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let post = state.db.create_post(NewPost {
        title: payload.title,
        slug: payload.slug,
        author_id: user.id,
        body: payload.body,
        publish: payload.publish,
        status: payload.status,
    })?;

    info!("Post created: {} ({}) by user {}", post.id, post.slug, user.id);

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /api/posts?status=PB&author=<uuid>&created=today&publish=this_year&q=...&page=1&limit=10
pub async fn list_posts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<PostListParams>,
) -> Json<PaginatedResponse<PostResponse>> {
    let posts = state.db.posts.search(&params.filter(), Utc::now());
    let limit = params.limit.max(1);
    let page = Paginator::new(posts, limit).get_page(params.page.as_deref());

    Json(PaginatedResponse {
        page: page.number,
        num_pages: page.num_pages,
        limit,
        total: page.count,
        data: page.items.into_iter().map(PostResponse::from).collect(),
    })
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.db.posts.get(id).ok_or(ApiError::NotFound)?;

    Ok(Json(post.into()))
}

/// PATCH /api/posts/{id}
/// Headers: Authorization: Bearer <token>
pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    owned_post(&state, &user, id)?;
    let post = state.db.posts.update(id, payload.into())?;

    info!("Post updated: {} by user {}", id, user.id);

    Ok(Json(post.into()))
}

/// DELETE /api/posts/{id}
/// Headers: Authorization: Bearer <token>
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    owned_post(&state, &user, id)?;
    state.db.posts.delete(id)?;

    info!("Post deleted: {} by user {}", id, user.id);

    Ok(StatusCode::NO_CONTENT)
}

// Check ownership
fn owned_post(state: &AppState, user: &AuthUser, id: i64) -> Result<Post, ApiError> {
    let post = state.db.posts.get(id).ok_or(ApiError::NotFound)?;
    if post.author_id != user.id {
        return Err(ApiError::Forbidden);
    }
    Ok(post)
}
