mod from_row;
pub mod queries;
pub mod seed;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::services::{ProductQueryService, SqliteProductService};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub products: Arc<dyn ProductQueryService>,
}

impl AppState {
    /// State backed entirely by the SQLite pool.
    pub fn new(db: DbPool) -> Self {
        let products = Arc::new(SqliteProductService::new(db.clone()));
        Self { db, products }
    }

    /// Same pool, different product source.
    pub fn with_products(db: DbPool, products: Arc<dyn ProductQueryService>) -> Self {
        Self { db, products }
    }
}

pub fn create_pool(path: &str, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(path);
    Pool::builder().max_size(max_size).build(manager)
}

pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT,
            price_cents INTEGER,
            currency TEXT,
            created_at INTEGER NOT NULL
        );

        -- Document tables: the entity lives in `body` as JSON, a few fields
        -- are copied out into columns for filtering.
        CREATE TABLE IF NOT EXISTS vouchers (
            id TEXT PRIMARY KEY,
            voucher_number INTEGER UNIQUE,
            body TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS voucher_codes (
            id TEXT PRIMARY KEY,
            voucher_id INTEGER NOT NULL,
            code TEXT NOT NULL UNIQUE,
            body TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_voucher_codes_voucher ON voucher_codes(voucher_id);

        CREATE TABLE IF NOT EXISTS promotions (
            id TEXT PRIMARY KEY,
            promotion_type TEXT NOT NULL,
            pmm_id TEXT NOT NULL,
            priority INTEGER NOT NULL,
            enabled INTEGER NOT NULL,
            voucher_id TEXT NOT NULL,
            body TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_promotions_type ON promotions(promotion_type);
        CREATE INDEX IF NOT EXISTS idx_promotions_voucher ON promotions(voucher_id);
        "#,
    )
}
