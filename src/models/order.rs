use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;
use super::{null_as_default, timestamp};

// ---------------------------------------------------------------------------
// Order - A placed sale with its line items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub order_time: DateTime<Utc>,
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub is_returned: bool,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        if self.is_returned {
            OrderStatus::Returned
        } else {
            OrderStatus::Completed
        }
    }

    /// Total units across all line items.
    pub fn item_count(&self) -> i64 {
        self.order_items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

// ---------------------------------------------------------------------------
// OrderItem - Persisted product/quantity pair within an order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl OrderItem {
    /// Display name: the line snapshot, else the embedded product's name.
    pub fn display_name(&self) -> &str {
        if !self.product_name.trim().is_empty() {
            return &self.product_name;
        }
        self.product.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// OrderStatus - Derived from the returned flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Returned,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "Completed",
            OrderStatus::Returned => "Returned",
        }
    }

    pub fn background_color(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "#E7F5E9",
            OrderStatus::Returned => "#FEE2E2",
        }
    }

    pub fn foreground_color(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "#2E7D32",
            OrderStatus::Returned => "#DC2626",
        }
    }
}

// ---------------------------------------------------------------------------
// CreateOrder - Request body for POST /Order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub discount: Decimal,
    pub order_items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
