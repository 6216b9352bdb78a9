//! Product lookups as seen by the HTTP layer.
//!
//! "Not found" is `Ok(None)`, never an error. Errors are reserved for the
//! store failing to answer.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::{DbPool, queries};
use crate::error::AppError;
use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0}")]
    Store(String),

    /// The failure carried no usable description.
    #[error("Unknown error")]
    Unknown,
}

impl QueryError {
    /// Underlying message, if the failure had one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            QueryError::Store(message) if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Keeps the underlying driver message, without the `AppError` prefix.
impl From<AppError> for QueryError {
    fn from(err: AppError) -> Self {
        let message = match err {
            AppError::Database(e) => e.to_string(),
            AppError::Pool(e) => e.to_string(),
            AppError::Serialization(e) => e.to_string(),
            AppError::NotFound(m)
            | AppError::BadRequest(m)
            | AppError::Conflict(m)
            | AppError::Internal(m) => m,
        };
        QueryError::Store(message)
    }
}

impl From<r2d2::Error> for QueryError {
    fn from(err: r2d2::Error) -> Self {
        QueryError::Store(err.to_string())
    }
}

impl From<tokio::task::JoinError> for QueryError {
    fn from(err: tokio::task::JoinError) -> Self {
        QueryError::Store(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQueryService: Send + Sync {
    /// Every product; may be empty.
    async fn fetch_all(&self) -> Result<Vec<Product>, QueryError>;

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Product>, QueryError>;
}

/// Reads products from the SQLite pool on the blocking thread pool.
#[derive(Clone)]
pub struct SqliteProductService {
    pool: DbPool,
}

impl SqliteProductService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductQueryService for SqliteProductService {
    async fn fetch_all(&self) -> Result<Vec<Product>, QueryError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Product>, QueryError> {
            let conn = pool.get()?;
            Ok(queries::list_products(&conn)?)
        })
        .await?
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Product>, QueryError> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Product>, QueryError> {
            let conn = pool.get()?;
            Ok(queries::get_product_by_id(&conn, &id)?)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use r2d2_sqlite::SqliteConnectionManager;

    use super::*;
    use crate::db::init_db;
    use crate::models::CreateProduct;

    fn memory_pool() -> DbPool {
        // One connection: every `:memory:` connection is its own database
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())
            .unwrap();
        init_db(&pool.get().unwrap()).unwrap();
        pool
    }

    #[test]
    fn detail_hides_empty_messages() {
        assert_eq!(QueryError::Store("DB down".into()).detail(), Some("DB down"));
        assert_eq!(QueryError::Store(String::new()).detail(), None);
        assert_eq!(QueryError::Unknown.detail(), None);
    }

    #[test]
    fn store_failure_keeps_driver_message_only() {
        let err = QueryError::from(AppError::from(rusqlite::Error::InvalidQuery));
        assert_eq!(err.detail(), Some(rusqlite::Error::InvalidQuery.to_string().as_str()));
        assert!(!err.to_string().starts_with("Database error"));

        let err = QueryError::from(AppError::Internal("disk full".into()));
        assert_eq!(err.detail(), Some("disk full"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn sqlite_service_serves_concurrent_lookups() {
        let service = std::sync::Arc::new(SqliteProductService::new(memory_pool()));

        let lookups: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.fetch_by_id(&format!("sku-{}", i)).await })
            })
            .collect();

        for lookup in lookups {
            assert_eq!(lookup.await.unwrap().unwrap(), None);
        }
    }

    #[tokio::test]
    async fn sqlite_service_reports_missing_product_as_none() {
        let service = SqliteProductService::new(memory_pool());
        assert_eq!(service.fetch_by_id("missing").await.unwrap(), None);
        assert!(service.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sqlite_service_finds_stored_product() {
        let pool = memory_pool();
        let created = {
            let conn = pool.get().unwrap();
            queries::create_product(
                &conn,
                &CreateProduct {
                    id: Some("sku-1".into()),
                    name: "Kettle".into(),
                    description: None,
                    category: None,
                    price_cents: Some(2999),
                    currency: Some("EUR".into()),
                },
            )
            .unwrap()
        };

        let service = SqliteProductService::new(pool);
        assert_eq!(service.fetch_by_id("sku-1").await.unwrap(), Some(created.clone()));
        assert_eq!(service.fetch_all().await.unwrap(), vec![created]);
    }
}
