use axum::{extract::Extension, http::StatusCode, routing::get, Router};

use crate::{db, state::AppState};

pub fn status_router() -> Router {
    Router::new().route("/db_status", get(db_status))
}

async fn db_status(Extension(state): Extension<AppState>) -> (StatusCode, String) {
    let pool = match state.db.pool() {
        Ok(pool) => pool,
        Err(reason) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("DB connection error: {reason}"),
            )
        }
    };

    match db::ping(pool).await {
        Ok(()) => (StatusCode::OK, "DB OK".to_string()),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("DB error: {e}")),
    }
}
