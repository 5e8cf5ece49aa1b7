use crate::{config::AppConfig, db::Database, mail::Mailer};
use std::sync::Arc;
use uuid::Uuid;

/// Shared by every request: the tables, the startup configuration and the
/// outbound mailer.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db: Database::new(),
            config: Arc::new(config),
            mailer,
        }
    }

    /// Display name for a post's author.
    pub fn author_name(&self, author_id: Uuid) -> String {
        self.db
            .users
            .get(author_id)
            .map(|user| user.username)
            .unwrap_or_else(|| "unknown".to_owned())
    }
}
