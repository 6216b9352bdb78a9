//! Bulk loading of catalog data from a JSON document.
//!
//! Promotions reference vouchers by storage id, which does not exist until the
//! voucher is inserted. Seed vouchers therefore carry a `key`, and a seed
//! promotion's `voucher` field may name either such a key or the storage id of
//! a voucher that is already in the database.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Deserialize;

use super::queries;
use crate::error::{AppError, Result};
use crate::models::{CreateProduct, Promotion, Voucher, VoucherCode};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedVoucher {
    pub key: String,
    #[serde(flatten)]
    pub voucher: Voucher,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<CreateProduct>,
    #[serde(default)]
    pub vouchers: Vec<SeedVoucher>,
    #[serde(default)]
    pub voucher_codes: Vec<VoucherCode>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub vouchers: usize,
    pub voucher_codes: usize,
    pub promotions: usize,
}

/// Insert everything in one transaction. Any failure leaves the database
/// untouched.
pub fn load_seed(conn: &mut Connection, seed: &SeedData) -> Result<SeedSummary> {
    let tx = conn.transaction()?;
    let mut summary = SeedSummary::default();

    for product in &seed.products {
        queries::create_product(&tx, product)?;
        summary.products += 1;
    }

    let mut voucher_ids: HashMap<&str, String> = HashMap::new();
    for entry in &seed.vouchers {
        if voucher_ids.contains_key(entry.key.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Duplicate voucher key in seed: {}",
                entry.key
            )));
        }
        let stored = queries::create_voucher(&tx, &entry.voucher)?;
        voucher_ids.insert(entry.key.as_str(), stored.id);
        summary.vouchers += 1;
    }

    for code in &seed.voucher_codes {
        queries::create_voucher_code(&tx, code)?;
        summary.voucher_codes += 1;
    }

    for promotion in &seed.promotions {
        let mut promotion = promotion.clone();
        let reference = promotion.base.voucher.as_str();

        if let Some(id) = voucher_ids.get(reference) {
            promotion.base.voucher = id.clone();
        } else if queries::get_voucher_by_id(&tx, reference)?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Promotion {} references unknown voucher {}",
                promotion.base.pmm_id, reference
            )));
        }

        queries::create_promotion(&tx, &promotion)?;
        summary.promotions += 1;
    }

    tx.commit()?;

    tracing::info!(
        products = summary.products,
        vouchers = summary.vouchers,
        voucher_codes = summary.voucher_codes,
        promotions = summary.promotions,
        "Seed data loaded"
    );

    Ok(summary)
}
