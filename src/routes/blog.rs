//! Public HTML pages: post list, post detail, share by email.

use crate::{
    errors::PageError,
    pagination::Paginator,
    share::{ShareForm, ShareState, share_message},
    states::AppState,
    views::{PageNav, PostDetailTemplate, PostListTemplate, PostShareTemplate, PostView, render_template},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::NaiveDate;
use tracing::info;

/// GET /?page=<n>
///
/// Query pairs are taken raw so that a repeated or malformed `page` still
/// yields a page instead of a 400.
pub async fn post_list(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Html<String>, PageError> {
    let page_number = query
        .iter()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.as_str());

    let page = Paginator::new(state.db.posts.published(), state.config.page_size)
        .get_page(page_number);

    let posts = page
        .items
        .iter()
        .map(|post| PostView::new(post, &state.author_name(post.author_id)))
        .collect();

    Ok(render_template(PostListTemplate {
        posts,
        page: PageNav::new(&page),
    })?)
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    State(state): State<AppState>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Result<Html<String>, PageError> {
    let date = parse_date(&year, &month, &day).ok_or(PageError::NotFound)?;
    let post = state.db.posts.find_published_on(date, &slug)?;
    let author = state.author_name(post.author_id);

    Ok(render_template(PostDetailTemplate {
        post: PostView::new(&post, &author),
    })?)
}

fn parse_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// GET /{post_id}/share/
pub async fn post_share_form(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let post_id: i64 = post_id.parse().map_err(|_| PageError::NotFound)?;
    let post = state.db.posts.find_published(post_id)?;
    let view = PostView::new(&post, &state.author_name(post.author_id));

    Ok(render_template(PostShareTemplate::new(view, &ShareState::empty()))?)
}

/// POST /{post_id}/share/
/// Body: name=...&email=...&to=...&comments=...
///
/// The body is read raw rather than through `Form`, so a wrong content type
/// or a repeated field re-renders the form instead of rejecting the request.
pub async fn post_share_submit(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    body: Bytes,
) -> Result<Html<String>, PageError> {
    let post_id: i64 = post_id.parse().map_err(|_| PageError::NotFound)?;
    let post = state.db.posts.find_published(post_id)?;

    let share = ShareState::submit(ShareForm::from_urlencoded(&body));
    if let ShareState::Sent { form } = &share {
        let post_url = format!("{}{}", state.config.site_url, post.absolute_url());
        let message = share_message(&post, form, &post_url, &state.config.mail_from);
        state.mailer.send(&message)?;
        info!("Post {} shared with {}", post.id, form.to);
    }

    let view = PostView::new(&post, &state.author_name(post.author_id));
    Ok(render_template(PostShareTemplate::new(view, &share))?)
}
