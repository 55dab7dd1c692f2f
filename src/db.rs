use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};

pub(crate) type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub(crate) type DbError = Box<dyn std::error::Error + Send + Sync>;

/// SQLite only enforces REFERENCES clauses when the pragma is set, and it is
/// per-connection, so every pooled connection gets it on checkout.
#[derive(Debug, Clone, Copy)]
struct ForeignKeyEnforcer;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ForeignKeyEnforcer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub(crate) fn build_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .connection_customizer(Box::new(ForeignKeyEnforcer))
        .build(manager)
}

pub(crate) fn ensure_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            email TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS food (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            price DOUBLE NOT NULL CHECK (price >= 0.0)
        );
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users (id),
            food_id INTEGER NOT NULL REFERENCES food (id)
        );",
    )
}

/// In-memory pool for tests. A single connection, otherwise every checkout
/// would see a different empty :memory: database.
#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(ForeignKeyEnforcer))
        .build(manager)
        .unwrap();
    ensure_schema(&mut pool.get().unwrap()).unwrap();
    pool
}
