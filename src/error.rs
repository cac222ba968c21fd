//! Errors returned by the HTTP handlers.
//!
//! Every variant renders as a small HTML page with a link back to the form,
//! so a browser posting the form always lands somewhere readable.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    model::schema::PlanError,
    pages::{escape, GO_BACK},
    password::PasswordError,
};

pub const UNIQUE_VIOLATION: &str = "23505";
const INTEGRITY_CLASS: &str = "23";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("DB not connected: {0}")]
    DbNotConnected(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Duplicate value: {0}")]
    DuplicateValue(String),

    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Error saving data: {message}")]
    Save { message: String, received: String },

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Error rendering page: {0}")]
    Render(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Classifies a failed query of the submit flow by SQLSTATE. `received`
    /// is the (redacted) form data shown on the generic error page.
    pub fn from_db(err: sqlx::Error, received: String) -> Self {
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
            _ => None,
        };

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::DuplicateValue(err.to_string()),
            Some(code) if code.starts_with(INTEGRITY_CLASS) => AppError::Integrity(err.to_string()),
            _ => AppError::Save {
                message: err.to_string(),
                received,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmailTaken(_) | AppError::UsernameTaken(_) => StatusCode::CONFLICT,
            AppError::Plan(PlanError::MissingRequired(_))
            | AppError::DuplicateValue(_)
            | AppError::Integrity(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DbNotConnected(_)
            | AppError::Plan(PlanError::NoMatchingColumns(_))
            | AppError::Save { .. }
            | AppError::Password(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(&self) -> String {
        match self {
            AppError::DbNotConnected(reason) => {
                format!("<h2>DB not connected:</h2><pre>{}</pre>{GO_BACK}", escape(reason))
            }
            AppError::EmailTaken(email) => format!(
                "<h2>Email already registered</h2>\
                 <p>The email {} is already in use. If this is your account, please <a href='/login'>log in</a>.\
                 <br>{GO_BACK}</p>",
                escape(email)
            ),
            AppError::UsernameTaken(username) => format!(
                "<h2>Username already taken</h2>\
                 <p>The username {} is already in use. Choose another username or <a href='/login'>log in</a>.\
                 <br>{GO_BACK}</p>",
                escape(username)
            ),
            AppError::Plan(e) => format!("<h2>Error:</h2><pre>{}</pre>{GO_BACK}", escape(&e.to_string())),
            AppError::DuplicateValue(detail) => format!(
                "<h2>Duplicate value</h2><p>A record with that email or unique field already exists. \
                 If this is your account, please log in. Error: {}</p>{GO_BACK}",
                escape(detail)
            ),
            AppError::Integrity(detail) => {
                format!("<h2>Data integrity error</h2><pre>{}</pre>{GO_BACK}", escape(detail))
            }
            AppError::Save { message, received } => format!(
                "<h2>Error saving data:</h2><pre>{}</pre><p>Received data: {}</p>{GO_BACK}",
                escape(message),
                escape(received)
            ),
            AppError::Password(e) => {
                format!("<h2>Error saving data:</h2><pre>{}</pre>{GO_BACK}", escape(&e.to_string()))
            }
            AppError::Render(detail) => {
                format!("<h2>Error rendering page:</h2><pre>{}</pre>", escape(detail))
            }
            AppError::NotFound(what) => format!("<h2>Not found</h2><p>{}</p>", escape(what)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Html(self.page())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::EmailTaken("a@b.c".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::UsernameTaken("alice".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Plan(PlanError::MissingRequired("email".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Plan(PlanError::NoMatchingColumns("registration".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::DuplicateValue("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DbNotConnected("refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pages_escape_user_input() {
        let page = AppError::EmailTaken("<b>x</b>@example.com".into()).page();
        assert!(page.contains("&lt;b&gt;x&lt;/b&gt;@example.com"));
        assert!(page.contains("href='/login'"));
    }

    #[test]
    fn test_non_database_error_is_generic() {
        let err = AppError::from_db(sqlx::Error::PoolTimedOut, "{}".to_string());
        assert!(matches!(err, AppError::Save { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
