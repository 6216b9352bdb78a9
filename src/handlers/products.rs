use axum::{extract::State, http::StatusCode};

use crate::db::AppState;
use crate::envelope::{EnvelopeResponse, respond_error, respond_ok};
use crate::extractors::Path;
use crate::models::Product;
use crate::services::QueryError;

pub const PRODUCT_NOT_FOUND: &str = "No product with such ID";

fn failure_message(prefix: &str, err: &QueryError) -> String {
    format!("{}: {}", prefix, err.detail().unwrap_or("Unknown error"))
}

pub async fn list_products(State(state): State<AppState>) -> EnvelopeResponse<Vec<Product>> {
    match state.products.fetch_all().await {
        Ok(products) => {
            tracing::debug!(count = products.len(), "Fetched product list");
            respond_ok(products)
        }
        Err(err) => {
            tracing::error!("Failed to fetch products: {}", err);
            respond_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                failure_message("Error fetching products", &err),
            )
        }
    }
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> EnvelopeResponse<Product> {
    match state.products.fetch_by_id(&product_id).await {
        Ok(Some(product)) => respond_ok(product),
        Ok(None) => {
            tracing::debug!(product_id = %product_id, "Product not found");
            respond_error(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND)
        }
        Err(err) => {
            tracing::error!("Failed to fetch product {}: {}", product_id, err);
            respond_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                failure_message("Error fetching product", &err),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
        routing::get,
    };
    use r2d2_sqlite::SqliteConnectionManager;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::services::MockProductQueryService;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: None,
            price_cents: Some(1000),
            currency: Some("USD".to_string()),
            created_at: 1_700_000_000,
        }
    }

    fn app(mock: MockProductQueryService) -> Router {
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())
            .unwrap();
        let state = AppState::with_products(pool, Arc::new(mock));

        Router::new()
            .route("/products", get(list_products))
            .route("/products/{product_id}", get(get_product))
            .with_state(state)
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn list_returns_service_products_unchanged() {
        let products = vec![product("a"), product("b")];
        let expected = serde_json::to_value(&products).unwrap();

        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_all()
            .times(1)
            .returning(move || Ok(products.clone()));

        let (status, body) = call(app(mock), "/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": expected, "error": null }));
    }

    #[tokio::test]
    async fn empty_list_is_still_success() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_all().returning(|| Ok(vec![]));

        let (status, body) = call(app(mock), "/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": [], "error": null }));
    }

    #[tokio::test]
    async fn list_failure_without_message_reports_unknown_error() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_all().returning(|| Err(QueryError::Unknown));

        let (status, body) = call(app(mock), "/products").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "data": null, "error": { "message": "Error fetching products: Unknown error" } })
        );
    }

    #[tokio::test]
    async fn list_failure_carries_store_message() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_all()
            .returning(|| Err(QueryError::Store("DB down".into())));

        let (status, body) = call(app(mock), "/products").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Error fetching products: DB down");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn get_returns_found_product() {
        let found = product("sku-42");
        let expected = serde_json::to_value(&found).unwrap();

        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_by_id()
            .withf(|id| id == "sku-42")
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        let (status, body) = call(app(mock), "/products/sku-42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "data": expected, "error": null }));
    }

    #[tokio::test]
    async fn get_missing_product_is_404() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_by_id().returning(|_| Ok(None));

        let (status, body) = call(app(mock), "/products/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "data": null, "error": { "message": "No product with such ID" } })
        );
    }

    #[tokio::test]
    async fn get_failure_carries_store_message() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_by_id()
            .returning(|_| Err(QueryError::Store("DB down".into())));

        let (status, body) = call(app(mock), "/products/anything").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "data": null, "error": { "message": "Error fetching product: DB down" } })
        );
    }

    #[tokio::test]
    async fn product_id_is_passed_through_unvalidated() {
        let mut mock = MockProductQueryService::new();
        mock.expect_fetch_by_id()
            .withf(|id| id == "not a uuid!")
            .returning(|_| Ok(None));

        let (status, _) = call(app(mock), "/products/not%20a%20uuid!").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
