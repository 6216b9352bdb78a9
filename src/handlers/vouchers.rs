use axum::{Json, extract::State};
use chrono::Utc;

use crate::db::{AppState, queries};
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extractors::{Path, Query};
use crate::models::{Persisted, Voucher, VoucherCode, VoucherFilter};

pub async fn list_vouchers(
    State(state): State<AppState>,
    Query(filter): Query<VoucherFilter>,
) -> Result<Json<Envelope<Vec<Persisted<Voucher>>>>> {
    let conn = state.db.get()?;
    let mut vouchers = queries::list_vouchers(&conn)?;

    if let Some(effective) = filter.effective {
        let now = Utc::now();
        vouchers.retain(|voucher| voucher.is_effective_at(now) == effective);
    }

    Ok(Json(Envelope::success(vouchers)))
}

pub async fn get_voucher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Persisted<Voucher>>>> {
    let conn = state.db.get()?;
    let voucher = queries::get_voucher_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Voucher not found".into()))?;
    Ok(Json(Envelope::success(voucher)))
}

/// Codes are linked through the voucher's numeric id, so a voucher without
/// one has no codes.
pub async fn list_voucher_codes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Vec<Persisted<VoucherCode>>>>> {
    let conn = state.db.get()?;
    let voucher = queries::get_voucher_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Voucher not found".into()))?;

    let codes = match voucher.entity.id {
        Some(voucher_number) => queries::list_voucher_codes(&conn, voucher_number)?,
        None => Vec::new(),
    };

    Ok(Json(Envelope::success(codes)))
}
