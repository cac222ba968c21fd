//! Configuration for the registration server
//!
//! Loaded from environment variables (and `.env` when present).
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `HOST`: Host to bind to (default: 127.0.0.1)
//! - `PORT`: Port to bind to (default: 5000)
//! - `TEMPLATES_DIR`: Directory holding `student_form.html` (default: templates)
//! - `STATIC_DIR`: Directory holding the static pages and assets (default: static)
use std::{env, path::PathBuf};

use anyhow::Context;
use tracing::info;

pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/Registration";

const FORM_TEMPLATE: &str = "student_form.html";
const FALLBACK_FORM: &str = "student form.html";
const HOME_PAGE: &str = "home_loggedin.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            info!("DATABASE_URL not set, using default: {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_url,
            templates_dir: env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
        })
    }

    /// Config rooted at `dir`, with `dir/templates` and `dir/static`.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            templates_dir: dir.join("templates"),
            static_dir: dir.join("static"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn form_template(&self) -> PathBuf {
        self.templates_dir.join(FORM_TEMPLATE)
    }

    pub fn fallback_form(&self) -> PathBuf {
        self.static_dir.join(FALLBACK_FORM)
    }

    pub fn home_page(&self) -> PathBuf {
        self.static_dir.join(HOME_PAGE)
    }
}
