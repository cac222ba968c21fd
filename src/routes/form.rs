use std::{io::ErrorKind, path::Path};

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::Html,
    routing::get,
    Router,
};
use tracing::{debug, warn};

use crate::{error::AppError, pages::SUCCESS, routes::auth::session_user, state::AppState};

pub fn form_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/success", get(success))
        .route("/home_loggedin", get(home_loggedin))
}

// Form utama: templates/student_form.html, atau "student form.html" sebagai cadangan
async fn index(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let template = state.config.form_template();

    match tokio::fs::read_to_string(&template).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, serving fallback form", template.display());
            read_page(&state.config.fallback_form()).await
        }
        Err(e) => {
            warn!("Error rendering form: {}", e);
            Err(AppError::Render(e.to_string()))
        }
    }
}

async fn success() -> Html<&'static str> {
    Html(SUCCESS)
}

async fn home_loggedin(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    debug!("Home page for user={:?}", session_user(&headers));
    read_page(&state.config.home_page()).await
}

async fn read_page(path: &Path) -> Result<Html<String>, AppError> {
    tokio::fs::read_to_string(path).await.map(Html).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AppError::NotFound(format!("{} does not exist", file_name(path)))
        } else {
            AppError::Render(e.to_string())
        }
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
