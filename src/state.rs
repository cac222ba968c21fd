use std::sync::Arc;

use crate::{config::Config, db::Database};

/// Shared by every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
