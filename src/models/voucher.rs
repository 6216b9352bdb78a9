use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LocalizedDescription;
use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub voucher_name: String,
    pub localized_descriptions: Vec<LocalizedDescription>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub effective_to: Option<DateTime<Utc>>,
    pub enabled: bool,
    pub discount_type: String,
    pub discount_amount: f64,
    pub quantity_redeemable_vouchers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_type: Option<String>,
    /// Partner-assigned numeric id; voucher codes point at this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Voucher {
    /// Enabled and inside the effective range. A missing bound is open.
    pub fn is_effective_at(&self, at: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(from) = self.effective_from
            && at < from
        {
            return false;
        }
        if let Some(to) = self.effective_to
            && at > to
        {
            return false;
        }
        true
    }
}

/// Query-string filter for voucher listings, e.g. `?effective=true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoucherFilter {
    /// Keep only vouchers whose effectiveness right now matches this flag
    #[serde(default)]
    pub effective: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherCode {
    pub voucher_id: i64,
    pub code: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub date_time_generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quantity_redeemable_vouchers: Option<u32>,
    #[serde(default)]
    pub redemptions_per_cart: Option<u32>,
    #[serde(default, deserialize_with = "timestamp::deserialize_optional")]
    pub generation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used: bool,
}
