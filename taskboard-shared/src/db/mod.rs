/// Database layer for Taskboard
///
/// This module provides PostgreSQL connection pooling and the embedded
/// migration runner. Table access itself lives on the model types in
/// [`crate::models`] and is reached through [`crate::store::PgStore`].
///
/// # Modules
///
/// - `pool`: connection pool creation with an up-front health check
/// - `migrations`: embedded sqlx migrations and database bootstrap
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::new(std::env::var("DATABASE_URL")?);
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
