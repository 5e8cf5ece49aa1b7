use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use blog::{
    AppConfig, AppState,
    mail::{EmailMessage, MailError, Mailer},
    models::{NewPost, Post, PostStatus, User},
};
use chrono::{TimeZone, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct Harness {
    state: AppState,
    mailer: Arc<RecordingMailer>,
    author: Uuid,
}

impl Harness {
    fn new() -> Self {
        let vars = HashMap::from([("JWT_SECRET".to_string(), "test-secret".to_string())]);
        let config = AppConfig::from_vars(vars).unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(config, mailer.clone());

        let author = User {
            id: Uuid::new_v4(),
            email: "writer@example.com".into(),
            username: "writer".into(),
            hashed_password: String::new(),
            created_at: Utc::now(),
        };
        state.db.users.insert(author.clone()).unwrap();

        Self {
            state,
            mailer,
            author: author.id,
        }
    }

    fn post(&self, title: &str, day: u32, status: PostStatus) -> Post {
        let mut new = NewPost::new(title, self.author, "First paragraph.\n\nSecond paragraph.");
        new.publish = Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap());
        new.status = Some(status);
        self.state.db.create_post(new).unwrap()
    }

    fn app(&self) -> Router {
        blog::app(self.state.clone())
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(self.app(), request).await
    }

    async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap();
        send(self.app(), request).await
    }

    async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body.to_owned()))
            .unwrap();
        send(self.app(), request).await
    }

    fn sent(&self) -> Vec<EmailMessage> {
        self.mailer.sent.lock().unwrap().clone()
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn seven_published(harness: &Harness) {
    for day in 1..=7 {
        harness.post(&format!("Post {day}"), day, PostStatus::Published);
    }
}

#[tokio::test]
async fn list_shows_first_page_of_published_posts() {
    let harness = Harness::new();
    seven_published(&harness);
    harness.post("Secret draft", 20, PostStatus::Draft);

    let (status, html) = harness.get("/").await;
    assert_eq!(status, StatusCode::OK);
    for title in ["Post 7", "Post 6", "Post 5"] {
        assert!(html.contains(title), "{title} missing");
    }
    assert!(!html.contains("Post 4"));
    assert!(!html.contains("Secret draft"));
    assert!(html.contains("Page 1 of 3."));
    assert!(html.contains("?page=2"));
    assert!(html.contains("by writer"));
}

#[tokio::test]
async fn list_with_non_integer_page_matches_default() {
    let harness = Harness::new();
    seven_published(&harness);

    let (_, default_page) = harness.get("/").await;
    let (status, garbage_page) = harness.get("/?page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(garbage_page, default_page);

    let (status, zero_page) = harness.get("/?page=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(zero_page, default_page);
}

#[tokio::test]
async fn list_with_out_of_range_page_shows_last_page() {
    let harness = Harness::new();
    seven_published(&harness);

    let (status, html) = harness.get("/?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Post 1"));
    assert!(!html.contains("Post 2"));
    assert!(html.contains("Page 3 of 3."));
    assert!(!html.contains("Next"));
}

#[tokio::test]
async fn list_with_repeated_page_uses_first_value() {
    let harness = Harness::new();
    seven_published(&harness);

    let (status, html) = harness.get("/?page=2&page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Page 2 of 3."));
    assert!(html.contains("Post 4"));
}

#[tokio::test]
async fn list_without_posts_renders_empty_page() {
    let harness = Harness::new();

    let (status, html) = harness.get("/?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Page 1 of 1."));
}

#[tokio::test]
async fn detail_resolves_published_post_by_date_and_slug() {
    let harness = Harness::new();
    harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness.get("/2024/1/15/hello-world/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Hello World</h1>"));
    assert!(html.contains("<p>Second paragraph.</p>"));

    let (status, _) = harness.get("/2024/01/15/hello-world/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn detail_of_draft_or_wrong_date_is_not_found() {
    let harness = Harness::new();
    harness.post("Hello World", 15, PostStatus::Draft);
    harness.post("Public", 15, PostStatus::Published);

    let (status, html) = harness.get("/2024/1/15/hello-world/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Not found"));

    for uri in ["/2024/1/16/public/", "/2024/13/15/public/", "/year/1/15/public/"] {
        let (status, _) = harness.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn share_form_renders_for_published_post() {
    let harness = Harness::new();
    let post = harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness.get(&format!("/{}/share/", post.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("name=\"email\""));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn share_of_draft_or_unknown_post_is_not_found() {
    let harness = Harness::new();
    let draft = harness.post("Draft", 15, PostStatus::Draft);

    for uri in [format!("/{}/share/", draft.id), "/999/share/".into(), "/abc/share/".into()] {
        let (status, _) = harness.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = harness
        .post_form(
            &format!("/{}/share/", draft.id),
            "name=A&email=a%40example.com&to=b%40example.com",
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(harness.sent().is_empty());
}

#[tokio::test]
async fn share_with_bad_email_rerenders_form_with_error() {
    let harness = Harness::new();
    let post = harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness
        .post_form(
            &format!("/{}/share/", post.id),
            "name=A&email=not-an-email&to=b%40example.com",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Enter a valid email address."));
    assert!(html.contains("value=\"not-an-email\""));
    assert!(!html.contains("successfully sent"));
    assert!(harness.sent().is_empty());
}

#[tokio::test]
async fn share_with_valid_payload_sends_email() {
    let harness = Harness::new();
    let post = harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness
        .post_form(
            &format!("/{}/share/", post.id),
            "name=A&email=a%40example.com&to=b%40example.com&comments=Nice+read",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("E-mail successfully sent"));

    let sent = harness.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "b@example.com");
    assert_eq!(sent[0].subject, "A recommends you read Hello World");
    assert!(sent[0]
        .body
        .contains("http://localhost:3000/2024/1/15/hello-world/"));
    assert!(sent[0].body.ends_with("A's comments: Nice read"));
}

#[tokio::test]
async fn share_with_repeated_field_uses_first_value() {
    let harness = Harness::new();
    let post = harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness
        .post_form(
            &format!("/{}/share/", post.id),
            "name=A&name=B&email=a%40example.com&to=b%40example.com",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("E-mail successfully sent"));
    assert_eq!(harness.sent()[0].subject, "A recommends you read Hello World");
}

#[tokio::test]
async fn share_without_form_content_type_rerenders_form() {
    let harness = Harness::new();
    let post = harness.post("Hello World", 15, PostStatus::Published);

    let (status, html) = harness
        .post_raw(&format!("/{}/share/", post.id), "{\"name\": \"A\"}")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This field is required."));
    assert!(harness.sent().is_empty());
}

#[tokio::test]
async fn share_of_draft_with_bad_body_is_not_found() {
    let harness = Harness::new();
    let draft = harness.post("Draft", 15, PostStatus::Draft);

    let (status, _) = harness
        .post_raw(&format!("/{}/share/", draft.id), "name=A&name=B")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = harness.post_raw("/999/share/", "%%%").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let harness = Harness::new();
    let (status, _) = harness.get("/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
