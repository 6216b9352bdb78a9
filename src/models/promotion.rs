//! Promotion documents.
//!
//! A promotion is a [`PromotionBase`] carrying the fields every promotion
//! shares, plus a [`PromotionKind`] holding the variant-specific payload. Both
//! are flattened into one JSON object; the `promotionType` key selects the
//! variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::ProductCategory;

/// Role of a component in a buy/get rule. Serialized as its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ComponentType {
    Buy = 0,
    Get = 1,
}

impl From<ComponentType> for u8 {
    fn from(value: ComponentType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for ComponentType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ComponentType::Buy),
            1 => Ok(ComponentType::Get),
            other => Err(format!("invalid component type: {}", other)),
        }
    }
}

/// Level of the catalog hierarchy a promotion item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HierarchyLevel {
    Product = 1,
    Category = 2,
}

impl From<HierarchyLevel> for u8 {
    fn from(value: HierarchyLevel) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for HierarchyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HierarchyLevel::Product),
            2 => Ok(HierarchyLevel::Category),
            other => Err(format!("invalid hierarchy level: {}", other)),
        }
    }
}

/// Discriminant of [`PromotionKind`], usable without the payload (filters,
/// indexed columns).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
    EnumIter,
)]
pub enum PromotionType {
    Multi,
    PriceBased,
    FixedDiscount,
    Shipping,
    XForY,
    SpendAndGet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedDescription {
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionItem {
    pub item: String,
    pub exclusion: bool,
    pub hierarchy_level: HierarchyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_field: Option<String>,
}

/// Purchase requirement shared by all promotions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionComponent {
    pub id: i64,
    pub purchase_type: String,
    pub quantity: u32,
    pub promotion_part: String,
    pub reward_derivation_rule_number: i64,
    pub items: Vec<ProductCategory>,
}

/// Purchase requirement that must be satisfied for Multi and XForY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyComponent {
    pub id: i64,
    pub purchase_type: String,
    pub quantity: u32,
    pub promotion_part: String,
    pub component_type: ComponentType,
    pub items: Vec<PromotionItem>,
    pub reward_derivation_rule_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub pmm_id: String,
    pub enabled: bool,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionBase {
    /// Partner program id
    pub pmm_id: String,
    pub name: String,
    pub description: String,
    pub priority_type: i32,
    pub components: Vec<PromotionComponent>,
    pub zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_log: Option<Vec<ActionLogEntry>>,
    pub localized_descriptions: Vec<LocalizedDescription>,
    pub discount_type: String,
    pub total_retail_price: f64,
    pub romance_copy_approved: bool,
    pub restriction_romance_copy_approved: bool,
    pub source_type: String,
    pub enabled: bool,
    pub apply_type: String,
    pub restrictions: Vec<String>,
    pub spent_limit_check: bool,
    pub version: i64,
    /// Storage id of the associated voucher
    pub voucher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTier {
    pub discount_amount: f64,
    pub price_type: i32,
    pub price_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPromotion {
    pub buy_component: BuyComponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBasedPromotion {
    pub items: Vec<PromotionItem>,
    pub discount_list: Vec<DiscountTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDiscountPromotion {
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPromotion {
    pub discount: f64,
    pub shipping_max_discount: f64,
    pub order_threshold: f64,
    pub delivery_mode: String,
    pub items: Vec<PromotionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XForYPromotion {
    pub discount: f64,
    pub buy_component: BuyComponent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendAndGetPromotion {
    pub items: Vec<PromotionItem>,
    pub gift_card_amount: f64,
    pub gift_card_expiration_date: DateTime<Utc>,
    pub gift_card_delivery_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "promotionType")]
pub enum PromotionKind {
    Multi(MultiPromotion),
    PriceBased(PriceBasedPromotion),
    FixedDiscount(FixedDiscountPromotion),
    Shipping(ShippingPromotion),
    XForY(XForYPromotion),
    SpendAndGet(SpendAndGetPromotion),
}

impl PromotionKind {
    pub fn promotion_type(&self) -> PromotionType {
        match self {
            PromotionKind::Multi(_) => PromotionType::Multi,
            PromotionKind::PriceBased(_) => PromotionType::PriceBased,
            PromotionKind::FixedDiscount(_) => PromotionType::FixedDiscount,
            PromotionKind::Shipping(_) => PromotionType::Shipping,
            PromotionKind::XForY(_) => PromotionType::XForY,
            PromotionKind::SpendAndGet(_) => PromotionType::SpendAndGet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(flatten)]
    pub base: PromotionBase,
    #[serde(flatten)]
    pub kind: PromotionKind,
}

impl Promotion {
    pub fn new(base: PromotionBase, kind: PromotionKind) -> Self {
        Self { base, kind }
    }

    pub fn promotion_type(&self) -> PromotionType {
        self.kind.promotion_type()
    }
}

/// Query-string filter for promotion listings, e.g. `?type=Shipping&enabled=true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionFilter {
    #[serde(rename = "type", default)]
    pub promotion_type: Option<PromotionType>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
