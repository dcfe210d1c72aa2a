// Migration Runner

use sqlx::SqlitePool;
use tracing::info;

/// Ordered migrations: (version, description, SQL)
const MIGRATIONS: &[(i64, &str, &str)] = &[
    (
        1,
        "Initial schema",
        include_str!("../migrations/001_initial_schema.sql"),
    ),
    (
        2,
        "Unique entity names",
        include_str!("../migrations/002_unique_names.sql"),
    ),
];

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    let current_version = current_version(pool).await?;
    info!("Current schema version: {}", current_version);

    // Apply migrations sequentially
    for (version, description, sql) in MIGRATIONS {
        if current_version < *version {
            info!("Applying migration {:03}: {}", version, description);
            apply_migration(pool, sql).await?;
        }
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Highest applied version, 0 on a fresh database
pub async fn current_version(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if table_exists == 0 {
        return Ok(0);
    }

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

/// Apply a single migration SQL file
async fn apply_migration(pool: &SqlitePool, sql: &str) -> Result<(), sqlx::Error> {
    // Execute migration in a transaction
    let mut tx = pool.begin().await?;

    // Split by semicolon and execute each statement
    for statement in sql.split(';') {
        // Remove comments and trim
        let clean_statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        if !clean_statement.is_empty() {
            sqlx::query(&clean_statement).execute(&mut *tx).await?;
        }
    }

    tx.commit().await?;
    Ok(())
}
