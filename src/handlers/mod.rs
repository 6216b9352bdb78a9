mod products;
mod promotions;
mod vouchers;

pub use products::*;
pub use promotions::*;
pub use vouchers::*;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::db::AppState;
use crate::envelope::Envelope;
use crate::error::AppError;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Envelope<HealthResponse>> {
    Json(Envelope::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Products
        .route("/products", get(list_products))
        .route("/products/{product_id}", get(get_product))
        // Promotions (read-only)
        .route("/promotions", get(list_promotions))
        .route("/promotions/{id}", get(get_promotion))
        // Vouchers (read-only)
        .route("/vouchers", get(list_vouchers))
        .route("/vouchers/{id}", get(get_voucher))
        .route("/vouchers/{id}/codes", get(list_voucher_codes))
        .fallback(route_not_found)
}
