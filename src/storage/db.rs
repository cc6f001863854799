use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::core::config;
use crate::core::error::AppResult;
use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Every connection gets the configured busy timeout and enforced foreign
/// keys. Schema migrations run once on the first connection.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use budgetbot::storage::create_pool;
///
/// let pool = create_pool("budget.sqlite")?;
/// # Ok::<(), budgetbot::core::error::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.busy_timeout(config::database::busy_timeout())?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
    });
    let pool = Pool::builder().max_size(config::database::MAX_POOL_SIZE).build(manager)?;

    migrate(&pool)?;
    Ok(pool)
}

/// Create a single-connection pool over a private in-memory database
///
/// Each in-memory SQLite connection is its own database, so the pool is
/// capped at one connection to keep every caller on the same data.
pub fn create_in_memory_pool() -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(1).build(manager)?;

    migrate(&pool)?;
    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

fn migrate(pool: &DbPool) -> AppResult<()> {
    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    Ok(())
}
