use std::collections::HashMap;

use axum::{
    extract::{Extension, Form},
    response::Redirect,
    routing::post,
    Router,
};
use sqlx::PgPool;
use tracing::{debug, error, info};

use crate::{
    db,
    error::AppError,
    model::{
        registration::{RedactedFields, RegistrationForm},
        schema::{InsertPlan, REGISTRATION_TABLE},
    },
    password::hash_password_blocking,
    state::AppState,
};

pub fn registration_router() -> Router {
    Router::new().route("/submit", post(submit))
}

// Handler submit form pendaftaran
async fn submit(
    Extension(state): Extension<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect, AppError> {
    let received = RedactedFields::new(&fields).to_string();
    debug!("Form Data Received: {}", received);

    let pool = state.db.pool().map_err(|reason| {
        error!("DB not connected, cannot save form: {}", reason);
        AppError::DbNotConnected(reason.to_string())
    })?;

    let form = RegistrationForm::from_fields(&fields);

    let schema = db::load_schema(pool, REGISTRATION_TABLE)
        .await
        .map_err(|e| AppError::from_db(e, received.clone()))?;

    check_duplicates(pool, &form).await?;

    let password_hash = match (&form.password, schema.column("password_hash")) {
        (Some(password), Some(_)) => Some(hash_password_blocking(password.clone()).await?),
        _ => None,
    };

    let plan = InsertPlan::build(
        REGISTRATION_TABLE,
        &schema,
        form.candidates(&schema, password_hash),
    )?;

    db::insert(pool, &plan)
        .await
        .map_err(|e| AppError::from_db(e, received))?;

    info!(
        "Inserted registration (cols={:?}) for user={}",
        plan.columns,
        form.display_name().unwrap_or("-")
    );
    Ok(Redirect::to("/success"))
}

/// Rejects an email (case-insensitive) or username that is already taken.
/// If the lookup itself fails the INSERT goes ahead and the unique
/// constraint decides.
async fn check_duplicates(pool: &PgPool, form: &RegistrationForm) -> Result<(), AppError> {
    if let Some(email) = &form.email {
        match db::email_taken(pool, email).await {
            Ok(true) => return Err(AppError::EmailTaken(email.clone())),
            Ok(false) => {}
            Err(e) => {
                error!("Pre-insert uniqueness check failed: {}", e);
                return Ok(());
            }
        }
    }

    if let Some(username) = &form.username {
        match db::username_taken(pool, username).await {
            Ok(true) => return Err(AppError::UsernameTaken(username.clone())),
            Ok(false) => {}
            Err(e) => error!("Pre-insert uniqueness check failed: {}", e),
        }
    }

    Ok(())
}
