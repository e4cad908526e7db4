use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

/// Quantity at or below which a product badge reads "Low Stock".
pub const LOW_STOCK_BADGE_THRESHOLD: i32 = 5;

pub const UNCATEGORIZED: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// Product - Catalog entry with on-hand quantity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i32,
}

impl Product {
    /// Category label, or "Uncategorized" when the API left it blank.
    pub fn category_name(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::for_quantity(self.quantity)
    }
}

// ---------------------------------------------------------------------------
// StockStatus - Badge shown on product cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

impl StockStatus {
    pub fn for_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity <= LOW_STOCK_BADGE_THRESHOLD {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::Low => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }

    /// Badge background as a hex color.
    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "#EF4444",
            StockStatus::Low => "#F59E0B",
            StockStatus::InStock => "#10B981",
        }
    }
}
