use crate::{
    models::Post,
    pagination::Page,
    share::{ShareForm, ShareState},
};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

const EXCERPT_WORDS: usize = 30;

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, askama::Error> {
    template.render().map(Html)
}

fn render_static<T: Template>(template: T, status: StatusCode) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, "Error page failed to render");
            (status, status.canonical_reason().unwrap_or_default()).into_response()
        }
    }
}

pub fn not_found_response() -> Response {
    render_static(NotFoundTemplate, StatusCode::NOT_FOUND)
}

pub fn server_error_response() -> Response {
    render_static(ServerErrorTemplate, StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub share_url: String,
    pub author: String,
    pub published: String,
    pub paragraphs: Vec<String>,
    pub excerpt: String,
}

impl PostView {
    pub fn new(post: &Post, author: &str) -> Self {
        let paragraphs = post
            .body
            .split("\n\n")
            .map(|p| p.trim().replace('\n', " "))
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            id: post.id,
            title: post.title.clone(),
            url: post.absolute_url(),
            share_url: format!("/{}/share/", post.id),
            author: author.to_owned(),
            published: post.publish.format("%B %-d, %Y").to_string(),
            paragraphs,
            excerpt: excerpt(&post.body, EXCERPT_WORDS),
        }
    }
}

fn excerpt(body: &str, words: usize) -> String {
    let mut iter = body.split_whitespace();
    let head: Vec<&str> = iter.by_ref().take(words).collect();
    let mut text = head.join(" ");
    if iter.next().is_some() {
        text.push_str(" …");
    }
    text
}

#[derive(Debug, Clone)]
pub struct PageNav {
    pub number: usize,
    pub num_pages: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl PageNav {
    pub fn new<T>(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            previous: page.previous_page_number(),
            next: page.next_page_number(),
        }
    }
}

#[derive(Template)]
#[template(path = "blog/post/list.html")]
pub struct PostListTemplate {
    pub posts: Vec<PostView>,
    pub page: PageNav,
}

#[derive(Template)]
#[template(path = "blog/post/detail.html")]
pub struct PostDetailTemplate {
    pub post: PostView,
}

/// Error slots for the share form, one per field.
#[derive(Debug, Clone, Default)]
pub struct ShareErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub to: Option<String>,
    pub comments: Option<String>,
}

#[derive(Template)]
#[template(path = "blog/post/share.html")]
pub struct PostShareTemplate {
    pub post: PostView,
    pub sent: bool,
    pub form: ShareForm,
    pub errors: ShareErrors,
}

impl PostShareTemplate {
    pub fn new(post: PostView, state: &ShareState) -> Self {
        let error = |field: &str| state.error(field).map(str::to_owned);
        Self {
            post,
            sent: state.is_sent(),
            form: state.form().clone(),
            errors: ShareErrors {
                name: error("name"),
                email: error("email"),
                to: error("to"),
                comments: error("comments"),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate;
