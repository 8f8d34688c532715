use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::OnceCell;
use tracing::{info, warn};

const MAX_CONNECTIONS: u32 = 20;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_ATTEMPTS: u32 = 6;
const FIRST_BACKOFF: Duration = Duration::from_secs(2);

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide pool, connected on first use. Concurrent first callers share
/// one connection attempt.
pub async fn init_pool(database_url: &str) -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| create_pool(database_url)).await
}

/// Connects with exponential backoff between attempts.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT);
    let mut backoff = FIRST_BACKOFF;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match options.clone().connect(database_url).await {
            Ok(pool) => {
                info!(attempt, "Database pool ready");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(
                    attempt,
                    max_attempts = CONNECT_ATTEMPTS,
                    retry_in = ?backoff,
                    error = %e,
                    "Database not reachable yet"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations applied");
    Ok(())
}
