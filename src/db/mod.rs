use sqlx::{
    FromRow, Pool, Sqlite,
    migrate::MigrateDatabase,
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow},
};
use tracing::{debug, info};

use crate::{config::Config, error::Result};

pub mod user_store;

pub type DbPool = Pool<Sqlite>;

/// Write metadata returned by [`Database::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    /// Rowid of the last inserted row
    pub last_id: i64,
    /// Number of rows changed by the statement
    pub changes: u64,
}

/// The process-wide database handle.
///
/// Holds a single SQLite connection that every statement is issued on.
#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Run a read statement and return every matching row
    pub async fn all<'q, T>(&self, query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>) -> Result<Vec<T>>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Run a write statement and return its metadata
    pub async fn run<'q>(&self, query: Query<'q, Sqlite, SqliteArguments<'q>>) -> Result<RunResult> {
        let done = query.execute(&self.pool).await?;

        Ok(RunResult {
            last_id: done.last_insert_rowid(),
            changes: done.rows_affected(),
        })
    }

    /// Close the underlying connection
    pub async fn close(self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

/// Open the database described by `config` and make sure the schema exists
pub async fn init_db(config: &Config) -> Result<Database> {
    let database_url = config.database_url.as_str();

    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    }

    // One connection, kept for the lifetime of the handle
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(config.acquire_timeout())
        .connect(database_url)
        .await?;

    let db = Database { pool };
    setup_database(&db).await?;

    info!("Database ready at {}", database_url);
    Ok(db)
}

/// Set up the database schema
pub async fn setup_database(db: &Database) -> Result<()> {
    db.run(sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            role TEXT DEFAULT 'admin',
            createdAt DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ))
    .await?;

    debug!("users table present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        init_db(&Config::new("sqlite::memory:"))
            .await
            .expect("Failed to open in-memory database")
    }

    #[tokio::test]
    async fn run_reports_last_id_and_changes() {
        let db = memory_db().await;

        let first = db
            .run(
                sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
                    .bind("a")
                    .bind("b"),
            )
            .await
            .unwrap();
        assert_eq!(first, RunResult { last_id: 1, changes: 1 });

        let updated = db
            .run(sqlx::query("UPDATE users SET role = ?").bind("user"))
            .await
            .unwrap();
        assert_eq!(updated.changes, 1);
    }

    #[tokio::test]
    async fn schema_default_role_is_admin() {
        let db = memory_db().await;

        db.run(
            sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
                .bind("raw")
                .bind("insert"),
        )
        .await
        .unwrap();

        let roles: Vec<(String,)> = db
            .all(sqlx::query_as("SELECT role FROM users"))
            .await
            .unwrap();
        assert_eq!(roles, vec![("admin".to_string(),)]);
    }

    #[tokio::test]
    async fn setup_database_is_idempotent() {
        let db = memory_db().await;

        setup_database(&db).await.unwrap();
        setup_database(&db).await.unwrap();

        let tables: Vec<(String,)> = db
            .all(sqlx::query_as(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
            ))
            .await
            .unwrap();
        assert_eq!(tables.len(), 1);
    }
}
