use blog::{AppConfig, AppState, mail::LogMailer};
use std::{process::ExitCode, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("blog=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let addr = config.bind_addr.clone();

    let state = AppState::new(config, Arc::new(LogMailer));
    let app = blog::app(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {}: {}", addr, err);
            return ExitCode::FAILURE;
        }
    };

    info!("Server running on http://{}", addr);
    info!("Blog pages:");
    info!("  GET    /                             - Published posts (paginated)");
    info!("  GET    /<year>/<month>/<day>/<slug>/ - Post detail");
    info!("  GET    /<id>/share/                  - Share form");
    info!("  POST   /<id>/share/                  - Share by email");
    info!("Editor API:");
    info!("  POST   /auth/signup      - Create account");
    info!("  POST   /auth/login       - Login");
    info!("  GET    /users/me         - Current user (auth)");
    info!("  DELETE /users/me         - Delete account and its posts (auth)");
    info!("  POST   /api/posts        - Create post (auth)");
    info!("  GET    /api/posts        - Filter and search posts (auth)");
    info!("  GET    /api/posts/:id    - Get post (auth)");
    info!("  PATCH  /api/posts/:id    - Update post (auth, author only)");
    info!("  DELETE /api/posts/:id    - Delete post (auth, author only)");

    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
