//! PostgreSQL access for the registration table.
//!
//! The server must come up even when Postgres is down, so the connection
//! outcome is kept as a [`Database`] value instead of aborting startup.
use sqlx::{postgres::PgPool, Row};
use tracing::{info, warn};

use crate::model::schema::{ColumnMeta, InsertPlan, SqlValue, TableSchema, REGISTRATION_TABLE};

#[derive(Debug, Clone)]
pub enum Database {
    Connected(PgPool),
    /// Why the initial connection failed.
    Unavailable(String),
}

impl Database {
    pub async fn connect(database_url: &str) -> Self {
        match PgPool::connect(database_url).await {
            Ok(pool) => {
                info!("Connected to Postgres successfully");
                Database::Connected(pool)
            }
            Err(e) => {
                warn!("Postgres connect failed: {}", e);
                Database::Unavailable(e.to_string())
            }
        }
    }

    pub fn pool(&self) -> Result<&PgPool, &str> {
        match self {
            Database::Connected(pool) => Ok(pool),
            Database::Unavailable(reason) => Err(reason),
        }
    }
}

const SEQUENCE_SETUP: [&str; 4] = [
    "CREATE SEQUENCE IF NOT EXISTS registration_user_id_seq",
    "ALTER TABLE registration ALTER COLUMN user_id SET DEFAULT nextval('registration_user_id_seq')",
    "ALTER SEQUENCE registration_user_id_seq OWNED BY registration.user_id",
    "SELECT setval('registration_user_id_seq', COALESCE((SELECT MAX(user_id) FROM registration), 0) + 1, false)",
];

/// Makes `registration.user_id` draw from `registration_user_id_seq`,
/// starting after the highest existing id. Failures are logged and rolled
/// back; the server keeps running either way.
pub async fn ensure_user_id_sequence(database: &Database) {
    let pool = match database.pool() {
        Ok(pool) => pool,
        Err(reason) => {
            warn!(
                "Skipping registration_user_id_seq setup because DB connection is not available: {}",
                reason
            );
            return;
        }
    };

    match setup_sequence(pool).await {
        Ok(()) => info!("Ensured registration_user_id_seq sequence is set up"),
        Err(e) => warn!("Failed to set up user_id sequence: {}", e),
    }
}

async fn setup_sequence(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in SEQUENCE_SETUP {
        if let Err(e) = sqlx::query(statement).execute(&mut tx).await {
            if let Err(rollback) = tx.rollback().await {
                warn!("Rollback failed during sequence setup: {}", rollback);
            }
            return Err(e);
        }
    }

    tx.commit().await
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

pub async fn load_schema(pool: &PgPool, table: &str) -> Result<TableSchema, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT column_name::text AS column_name,
                data_type::text AS data_type,
                udt_name::text AS udt_name,
                is_nullable::text AS is_nullable,
                column_default::text AS column_default
         FROM information_schema.columns
         WHERE table_name = $1 AND table_schema = current_schema()",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row.try_get("column_name")?;
        let is_nullable: String = row.try_get("is_nullable")?;
        columns.push((
            name,
            ColumnMeta {
                data_type: row.try_get("data_type")?,
                udt_name: row.try_get("udt_name")?,
                nullable: is_nullable != "NO",
                default: row.try_get("column_default")?,
            },
        ));
    }

    Ok(TableSchema::from_columns(columns))
}

pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM registration WHERE LOWER(email) = LOWER($1) LIMIT 1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub async fn username_taken(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM registration WHERE username = $1 LIMIT 1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn insert(pool: &PgPool, plan: &InsertPlan) -> Result<(), sqlx::Error> {
    let sql = plan.sql(REGISTRATION_TABLE);
    let mut query = sqlx::query(&sql);

    for value in &plan.values {
        query = match value {
            SqlValue::Text(text) => query.bind(text.clone()),
            SqlValue::Int(n) => query.bind(*n),
        };
    }

    query.execute(pool).await?;
    Ok(())
}
