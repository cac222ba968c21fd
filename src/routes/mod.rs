pub mod auth;
pub mod form;
pub mod registration;
pub mod status;

use axum::{extract::Extension, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::state::AppState;

use self::{
    auth::auth_router, form::form_router, registration::registration_router,
    status::status_router,
};

pub fn build_router(state: AppState) -> Router {
    // Aset statis (css, js, gambar) untuk semua path lain
    let serve_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Form, halaman sukses & home
        .merge(form_router())
        // POST /submit
        .merge(registration_router())
        // Login stub & logout
        .merge(auth_router())
        .merge(status_router())
        .fallback_service(serve_dir)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
}
