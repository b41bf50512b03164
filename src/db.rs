//! SQLite connection pool for the grounds database.
//!
//! Web handlers, the seeding binary and integration tests all build their
//! pool here so every connection gets the same pragmas. Foreign keys are
//! always enforced: deleting a property relies on them to cascade to its
//! services, events, tickets and attachments.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;
use serde::Deserialize;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

fn default_wal() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    30_000
}

fn default_max_connections() -> u32 {
    10
}

/// Tunables read from the `database` section of the configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Use write-ahead logging so readers do not block the writer.
    #[serde(default = "default_wal")]
    pub wal: bool,
    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            wal: default_wal(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    fn pragmas(&self) -> String {
        let mut pragmas = String::from("PRAGMA foreign_keys = ON;");
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        pragmas.push_str(&format!(" PRAGMA busy_timeout = {};", self.busy_timeout_ms));
        pragmas
    }
}

#[derive(Debug)]
struct SqlitePragmas(String);

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.0)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens a pool on `database_url` configured by `settings`.
pub fn establish_connection_pool(
    database_url: &str,
    settings: &DatabaseSettings,
) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(settings.max_connections)
        .connection_customizer(Box::new(SqlitePragmas(settings.pragmas())))
        .build(manager)
}

/// Checks a connection out of the pool, logging when none is available.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().map_err(|e| {
        log::error!("Failed to get connection from pool: {e}");
        e
    })
}
