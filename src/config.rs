use std::{collections::HashMap, env};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Settings read once at startup and shared with every handler.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub page_size: usize,
    /// Scheme and host prepended to post links in share emails.
    pub site_url: String,
    pub mail_from: String,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let page_size = match get("BLOG_PAGE_SIZE") {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size >= 1)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "BLOG_PAGE_SIZE",
                    value: raw.to_owned(),
                })?,
        };

        let bcrypt_cost = match get("BLOG_BCRYPT_COST") {
            None => bcrypt::DEFAULT_COST,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| ConfigError::Invalid {
                    name: "BLOG_BCRYPT_COST",
                    value: raw.to_owned(),
                })?,
        };

        Ok(Self {
            bind_addr: get("BLOG_BIND_ADDR").unwrap_or("0.0.0.0:3000").to_owned(),
            jwt_secret: jwt_secret.to_owned(),
            page_size,
            site_url: get("BLOG_SITE_URL")
                .unwrap_or("http://localhost:3000")
                .trim_end_matches('/')
                .to_owned(),
            mail_from: get("BLOG_MAIL_FROM").unwrap_or("blog@localhost").to_owned(),
            bcrypt_cost,
        })
    }
}
