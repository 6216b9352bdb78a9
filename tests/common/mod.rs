//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub use storefront::db::{AppState, DbPool, queries};
pub use storefront::models::*;

pub const SEED_JSON: &str = include_str!("../../fixtures/seed.json");

/// File-backed pool in a temporary directory. Keep the `TempDir` alive for
/// as long as the pool is used.
pub fn create_test_pool() -> (DbPool, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storefront-test.db");
    let manager = SqliteConnectionManager::file(&path);
    let pool = Pool::builder().max_size(4).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        storefront::db::init_db(&conn).unwrap();
    }
    (pool, dir)
}

pub fn create_test_app_state() -> (AppState, TempDir) {
    let (pool, dir) = create_test_pool();
    (AppState::new(pool), dir)
}

pub fn test_app(state: AppState) -> Router {
    storefront::handlers::router().with_state(state)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).expect("Response should be valid JSON");
    (status, json)
}

/// Exactly one of `data`/`error` is non-null, and nothing else is present.
pub fn assert_envelope_shape(body: &Value) {
    let object = body.as_object().expect("envelope should be an object");
    assert_eq!(object.len(), 2, "envelope should have exactly two keys");
    assert!(object.contains_key("data") && object.contains_key("error"));
    assert_ne!(
        body["data"].is_null(),
        body["error"].is_null(),
        "exactly one of data/error must be set: {}",
        body
    );
}

pub fn create_test_product(conn: &Connection, id: &str, name: &str) -> Product {
    queries::create_product(
        conn,
        &CreateProduct {
            id: Some(id.to_string()),
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            category: Some(ProductCategory {
                id: "cat-test".to_string(),
                name: Some("Test".to_string()),
            }),
            price_cents: Some(1999),
            currency: Some("USD".to_string()),
        },
    )
    .expect("Failed to create test product")
}

pub fn sample_voucher(number: Option<i64>) -> Voucher {
    Voucher {
        voucher_name: "WELCOME".to_string(),
        localized_descriptions: vec![LocalizedDescription {
            locale: "en_US".to_string(),
            short_description: Some("Welcome".to_string()),
            long_description: None,
        }],
        effective_from: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        effective_to: None,
        enabled: true,
        discount_type: "PERCENT".to_string(),
        discount_amount: 15.0,
        quantity_redeemable_vouchers: 50,
        voucher_type: Some("PUBLIC".to_string()),
        id: number,
        code: Some("WELCOME15".to_string()),
    }
}

pub fn sample_base(pmm_id: &str, voucher: &str, priority: i32) -> PromotionBase {
    PromotionBase {
        pmm_id: pmm_id.to_string(),
        name: format!("Promotion {}", pmm_id),
        description: "Test promotion".to_string(),
        priority_type: priority,
        components: vec![PromotionComponent {
            id: 1,
            purchase_type: "QUANTITY".to_string(),
            quantity: 2,
            promotion_part: "A".to_string(),
            reward_derivation_rule_number: 1,
            items: vec![ProductCategory {
                id: "cat-test".to_string(),
                name: None,
            }],
        }],
        zones: vec!["EU".to_string()],
        action_log: None,
        localized_descriptions: vec![LocalizedDescription {
            locale: "en_US".to_string(),
            short_description: Some("Deal".to_string()),
            long_description: Some("A very good deal".to_string()),
        }],
        discount_type: "PERCENT".to_string(),
        total_retail_price: 59.97,
        romance_copy_approved: true,
        restriction_romance_copy_approved: false,
        source_type: "PARTNER".to_string(),
        enabled: true,
        apply_type: "AUTO".to_string(),
        restrictions: vec!["NO_STACKING".to_string()],
        spent_limit_check: true,
        version: 4,
        voucher: voucher.to_string(),
    }
}

pub fn sample_item(item: &str, level: HierarchyLevel) -> PromotionItem {
    PromotionItem {
        item: item.to_string(),
        exclusion: false,
        hierarchy_level: level,
        brand: None,
        code_field: None,
    }
}

pub fn price_based_promotion(pmm_id: &str, voucher: &str, priority: i32) -> Promotion {
    Promotion::new(
        sample_base(pmm_id, voucher, priority),
        PromotionKind::PriceBased(PriceBasedPromotion {
            items: vec![sample_item("cat-test", HierarchyLevel::Category)],
            discount_list: vec![
                DiscountTier {
                    discount_amount: 5.0,
                    price_type: 1,
                    price_name: "REGULAR".to_string(),
                },
                DiscountTier {
                    discount_amount: 7.5,
                    price_type: 2,
                    price_name: "MEMBER".to_string(),
                },
            ],
        }),
    )
}

pub fn fixed_discount_promotion(pmm_id: &str, voucher: &str, priority: i32) -> Promotion {
    Promotion::new(
        sample_base(pmm_id, voucher, priority),
        PromotionKind::FixedDiscount(FixedDiscountPromotion { discount: 3.0 }),
    )
}
