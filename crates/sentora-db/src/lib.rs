pub mod errors;
pub mod models;
pub mod pool;
pub mod schema;
pub mod types;

pub use errors::{DatabaseError, ErrorKind};
pub use pool::SentoraPool;

use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build the deadpool-diesel pool used by every service of the app.
pub fn init_pool(app_name: &str, database_url: &str) -> Result<Pool, ErrorKind> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    let pool = Pool::builder(manager)
        .build()
        .map_err(|e| ErrorKind::Pool(e.to_string()))?;

    tracing::info!("🗃️ {app_name}: database pool initialized");
    Ok(pool)
}

/// Apply any pending embedded migrations. Called once at startup, before
/// the services are spawned.
pub async fn run_migrations(pool: &Pool) -> anyhow::Result<()> {
    let conn = pool
        .get()
        .await
        .map_err(|e| anyhow::anyhow!("cannot get connection for migrations: {e}"))?;

    let applied = conn
        .interact(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))
        })
        .await
        .map_err(|e| anyhow::anyhow!("migration interaction failed: {e}"))??;

    if applied > 0 {
        tracing::info!("🗃️ Applied {applied} database migration(s)");
    }
    Ok(())
}
