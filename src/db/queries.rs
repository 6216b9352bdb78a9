use chrono::Utc;
use rusqlite::{Connection, ErrorCode, ToSql, params, types::Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{DOCUMENT_COLS, PRODUCT_COLS, query_all, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turn a UNIQUE violation into a conflict, pass everything else through.
fn unique_conflict(err: rusqlite::Error, message: impl FnOnce() -> String) -> AppError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err
        && e.code == ErrorCode::ConstraintViolation
    {
        return AppError::Conflict(message());
    }
    AppError::Database(err)
}

// ============ Products ============

pub fn create_product(conn: &Connection, input: &CreateProduct) -> Result<Product> {
    let id = input.id.clone().unwrap_or_else(gen_id);
    let now = now();
    let category = input
        .category
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        "INSERT INTO products (id, name, description, category, price_cents, currency, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &id,
            &input.name,
            &input.description,
            &category,
            input.price_cents,
            &input.currency,
            now
        ],
    )
    .map_err(|e| unique_conflict(e, || format!("Product {} already exists", id)))?;

    Ok(Product {
        id,
        name: input.name.clone(),
        description: input.description.clone(),
        category: input.category.clone(),
        price_cents: input.price_cents,
        currency: input.currency.clone(),
        created_at: now,
    })
}

pub fn get_product_by_id(conn: &Connection, id: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLS),
        &[&id],
    )
}

/// Newest first; id breaks ties between products created in the same second.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM products ORDER BY created_at DESC, id ASC",
            PRODUCT_COLS
        ),
        &[],
    )
}

// ============ Vouchers ============

pub fn create_voucher(conn: &Connection, voucher: &Voucher) -> Result<Persisted<Voucher>> {
    let id = gen_id();
    let now = now();
    let body = serde_json::to_string(voucher)?;

    conn.execute(
        "INSERT INTO vouchers (id, voucher_number, body, revision, created_at, updated_at)
         VALUES (?1, ?2, ?3, 0, ?4, ?4)",
        params![&id, voucher.id, &body, now],
    )
    .map_err(|e| {
        unique_conflict(e, || {
            format!("Voucher number {} is already taken", voucher.id.unwrap_or_default())
        })
    })?;

    Ok(Persisted {
        id,
        revision: 0,
        created_at: now,
        updated_at: now,
        entity: voucher.clone(),
    })
}

pub fn get_voucher_by_id(conn: &Connection, id: &str) -> Result<Option<Persisted<Voucher>>> {
    query_one(
        conn,
        &format!("SELECT {} FROM vouchers WHERE id = ?1", DOCUMENT_COLS),
        &[&id],
    )
}

pub fn list_vouchers(conn: &Connection) -> Result<Vec<Persisted<Voucher>>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM vouchers ORDER BY created_at ASC, id ASC",
            DOCUMENT_COLS
        ),
        &[],
    )
}

// ============ Voucher codes ============

pub fn create_voucher_code(conn: &Connection, code: &VoucherCode) -> Result<Persisted<VoucherCode>> {
    let id = gen_id();
    let now = now();
    let body = serde_json::to_string(code)?;

    conn.execute(
        "INSERT INTO voucher_codes (id, voucher_id, code, body, revision, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![&id, code.voucher_id, &code.code, &body, now],
    )
    .map_err(|e| unique_conflict(e, || format!("Voucher code {} already exists", code.code)))?;

    Ok(Persisted {
        id,
        revision: 0,
        created_at: now,
        updated_at: now,
        entity: code.clone(),
    })
}

pub fn list_voucher_codes(conn: &Connection, voucher_id: i64) -> Result<Vec<Persisted<VoucherCode>>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM voucher_codes WHERE voucher_id = ?1 ORDER BY created_at ASC, code ASC",
            DOCUMENT_COLS
        ),
        &[&voucher_id],
    )
}

// ============ Promotions ============

pub fn create_promotion(conn: &Connection, promotion: &Promotion) -> Result<Persisted<Promotion>> {
    let id = gen_id();
    let now = now();
    let body = serde_json::to_string(promotion)?;

    conn.execute(
        "INSERT INTO promotions
            (id, promotion_type, pmm_id, priority, enabled, voucher_id, body, revision, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)",
        params![
            &id,
            promotion.promotion_type().as_ref(),
            &promotion.base.pmm_id,
            promotion.base.priority_type,
            promotion.base.enabled,
            &promotion.base.voucher,
            &body,
            now
        ],
    )?;

    Ok(Persisted {
        id,
        revision: 0,
        created_at: now,
        updated_at: now,
        entity: promotion.clone(),
    })
}

pub fn get_promotion_by_id(conn: &Connection, id: &str) -> Result<Option<Persisted<Promotion>>> {
    query_one(
        conn,
        &format!("SELECT {} FROM promotions WHERE id = ?1", DOCUMENT_COLS),
        &[&id],
    )
}

/// Lowest priority value first, then oldest.
pub fn list_promotions(
    conn: &Connection,
    filter: &PromotionFilter,
) -> Result<Vec<Persisted<Promotion>>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(promotion_type) = filter.promotion_type {
        clauses.push("promotion_type = ?");
        values.push(promotion_type.as_ref().to_string().into());
    }
    if let Some(enabled) = filter.enabled {
        clauses.push("enabled = ?");
        values.push(i64::from(enabled).into());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {} FROM promotions{} ORDER BY priority ASC, created_at ASC, id ASC",
        DOCUMENT_COLS, where_sql
    );
    let params: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
    query_all(conn, &sql, &params)
}

/// Replace a promotion document if it is still at `expected_revision`.
pub fn update_promotion(
    conn: &Connection,
    id: &str,
    promotion: &Promotion,
    expected_revision: i64,
) -> Result<Persisted<Promotion>> {
    let body = serde_json::to_string(promotion)?;

    let updated = conn.execute(
        "UPDATE promotions
         SET promotion_type = ?1, pmm_id = ?2, priority = ?3, enabled = ?4, voucher_id = ?5,
             body = ?6, revision = revision + 1, updated_at = ?7
         WHERE id = ?8 AND revision = ?9",
        params![
            promotion.promotion_type().as_ref(),
            &promotion.base.pmm_id,
            promotion.base.priority_type,
            promotion.base.enabled,
            &promotion.base.voucher,
            &body,
            now(),
            id,
            expected_revision
        ],
    )?;

    if updated == 0 {
        return match get_promotion_by_id(conn, id)? {
            None => Err(AppError::NotFound("Promotion not found".into())),
            Some(current) => Err(AppError::Conflict(format!(
                "Promotion {} is at revision {}, expected {}",
                id, current.revision, expected_revision
            ))),
        };
    }

    get_promotion_by_id(conn, id)?
        .ok_or_else(|| AppError::Internal(format!("Promotion {} vanished after update", id)))
}

/// Enable or disable a promotion and append the change to its action log.
pub fn set_promotion_enabled(
    conn: &Connection,
    id: &str,
    enabled: bool,
    pmm_id: &str,
) -> Result<Persisted<Promotion>> {
    let current = get_promotion_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("Promotion not found".into()))?;

    let revision = current.revision;
    let mut promotion = current.into_inner();
    promotion.base.enabled = enabled;
    promotion
        .base
        .action_log
        .get_or_insert_with(Vec::new)
        .push(ActionLogEntry {
            pmm_id: pmm_id.to_string(),
            enabled,
            date: Utc::now(),
        });

    update_promotion(conn, id, &promotion, revision)
}
