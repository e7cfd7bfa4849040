use std::str::FromStr;

use pagewise_core::Credential;
use sqlx::{
    PgPool,
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

/// Compile-time discovered SQLx migrations for the `pagewise-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`.
    ///
    /// A `password` overrides whatever the URL carries.
    pub async fn connect(
        url: &str,
        password: Option<&Credential>,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let mut options = PgConnectOptions::from_str(url)?;
        if let Some(password) = password {
            options = options.password(password.expose());
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        info!(max_connections, "PostgreSQL connection established.");

        Ok(Self::new(pool))
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// In-process keyset source.
pub mod memory;
/// PostgreSQL keyset source.
pub mod postgres;

pub use memory::{MemoryPageSource, seed_library_pins};
pub use postgres::{ColumnSpec, PgPageSource, TableSpec};
