use axum::{
    extract::Form,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use cookie::{Cookie, SameSite};
use serde::Deserialize;
use tracing::{debug, info};

use crate::pages::LOGIN_FORM;

pub const SESSION_COOKIE: &str = "user";

// Payload untuk login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
}

// Buat router khusus auth
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

async fn login_form() -> Html<&'static str> {
    Html(LOGIN_FORM)
}

// Login stub: credentials are not checked, the username is only remembered
async fn login(Form(payload): Form<LoginForm>) -> impl IntoResponse {
    let username = payload.username.unwrap_or_default();
    info!("Unverified login for user={}", username);

    let cookie = Cookie::build((SESSION_COOKIE, username))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (
        [(header::SET_COOKIE, cookie.encoded().to_string())],
        Redirect::to("/home_loggedin"),
    )
}

async fn logout(headers: HeaderMap) -> impl IntoResponse {
    if let Some(user) = session_user(&headers) {
        debug!("Logging out user={}", user);
    }

    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();

    (
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::to("/"),
    )
}

/// Username stored by the login stub, if any.
pub fn session_user(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|user| !user.is_empty())
}
