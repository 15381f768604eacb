/// Database migration runner
///
/// Migrations live in `taskboard-shared/migrations/` and are embedded into
/// the binary at compile time with `sqlx::migrate!`, so the server needs no
/// migration files at runtime.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Migration status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Number of successfully applied migrations
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp prefix)
    pub latest_version: Option<i64>,

    /// Number of migrations embedded in this build
    pub embedded_migrations: usize,
}

impl MigrationStatus {
    /// True when every embedded migration has been applied
    pub fn is_up_to_date(&self) -> bool {
        self.applied_migrations >= self.embedded_migrations
    }
}

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or was modified after
/// being applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database migrations completed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Reports how many migrations are applied compared to the embedded set
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried.
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let embedded_migrations = sqlx::migrate!("./migrations").iter().count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
            embedded_migrations,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: usize::try_from(count).unwrap_or_default(),
        latest_version,
        embedded_migrations,
    })
}

/// Creates the database if it does not exist (development and tests)
///
/// # Errors
///
/// Returns an error if the server is unreachable or the role lacks
/// `CREATEDB`.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
