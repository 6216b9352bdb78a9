use axum::{Json, extract::State};

use crate::db::{AppState, queries};
use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extractors::{Path, Query};
use crate::models::{Persisted, Promotion, PromotionFilter};

pub async fn list_promotions(
    State(state): State<AppState>,
    Query(filter): Query<PromotionFilter>,
) -> Result<Json<Envelope<Vec<Persisted<Promotion>>>>> {
    let conn = state.db.get()?;
    let promotions = queries::list_promotions(&conn, &filter)?;
    Ok(Json(Envelope::success(promotions)))
}

pub async fn get_promotion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Persisted<Promotion>>>> {
    let conn = state.db.get()?;
    let promotion = queries::get_promotion_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Promotion not found".into()))?;
    Ok(Json(Envelope::success(promotion)))
}
