use rusqlite::{Connection, OptionalExtension, Row, ToSql, types::Type};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{Persisted, Product};

pub const PRODUCT_COLS: &str = "id, name, description, category, price_cents, currency, created_at";

/// Shared column list of every document table.
pub const DOCUMENT_COLS: &str = "id, revision, created_at, updated_at, body";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn parse_json<T: DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for Product {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let category: Option<String> = row.get(3)?;
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            category: category.map(|raw| parse_json(3, &raw)).transpose()?,
            price_cents: row.get(4)?,
            currency: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl<T: DeserializeOwned> FromRow for Persisted<T> {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let body: String = row.get(4)?;
        Ok(Persisted {
            id: row.get(0)?,
            revision: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
            entity: parse_json(4, &body)?,
        })
    }
}

pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Option<T>> {
    let item = conn.query_row(sql, params, |row| T::from_row(row)).optional()?;
    Ok(item)
}

pub fn query_all<T: FromRow>(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    let items = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}
