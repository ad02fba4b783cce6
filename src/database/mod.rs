pub mod assert;

use std::time::Duration;

use actix_web::{error::BlockingError, rt::time::timeout, web};
use anyhow::Context;
use diesel::{connection::SimpleConnection, r2d2::ConnectionManager, SqliteConnection};
use r2d2::{CustomizeConnection, PooledConnection};

use crate::{config::Config, error::ServiceError, state::AppState};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("../../migrations/2021-03-01-000000_create_scheduling/up.sql");

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn connect(config: &Config) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = r2d2::Pool::builder()
        .max_size(config.db_pool_size)
        .connection_timeout(config.db_timeout)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: config.db_timeout,
        }))
        .build(manager)
        .context("Failed to create pool")?;

    let conn = pool.get().context("DB connection")?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")
        .context("Failed to enable WAL")?;
    conn.batch_execute(SCHEMA)
        .context("Failed to apply schema")?;

    Ok(pool)
}

pub fn get_db_conn(
    pool: &DbPool,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, ServiceError> {
    pool.get().map_err(|err| {
        tracing::warn!(error = %err, "no DB connection within timeout");
        ServiceError::StoreUnavailable
    })
}

/// Runs `f` on the blocking pool with a pooled connection, bounded by the
/// store timeout.
pub async fn run<F, T>(state: &AppState, f: F) -> Result<T, ServiceError>
where
    F: FnOnce(&SqliteConnection) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    let task = web::block(move || {
        let conn = get_db_conn(&pool)?;
        f(&*conn)
    });

    match timeout(state.store_timeout, task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(BlockingError::Error(err))) => Err(err),
        Ok(Err(BlockingError::Canceled)) => Err(ServiceError::StoreUnavailable),
        Err(_) => {
            tracing::warn!(timeout = ?state.store_timeout, "store operation timed out");
            Err(ServiceError::StoreUnavailable)
        }
    }
}
