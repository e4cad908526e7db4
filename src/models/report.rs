use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;

// ---------------------------------------------------------------------------
// BestSellingProduct - Line items grouped by product, ranked by quantity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BestSellingProduct {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub total_quantity_sold: i64,
    pub total_revenue: Decimal,
}

// ---------------------------------------------------------------------------
// ProductSales - Per-product row of the daily/monthly sales report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductSales {
    pub product_name: String,
    pub total_quantity_sold: i64,
    pub total_revenue: Decimal,
    pub order_count: usize,
}

// ---------------------------------------------------------------------------
// SalesSummary - Headline numbers for a window of orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SalesSummary {
    pub order_count: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub items_sold: i64,
}

// ---------------------------------------------------------------------------
// LowStockProduct - Row of the low stock alert report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    Critical,
    Low,
}

impl StockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::Critical => "Critical",
            StockLevel::Low => "Low",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StockLevel::Critical => "#DC2626",
            StockLevel::Low => "#F59E0B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LowStockProduct {
    pub id: Uuid,
    pub product_name: String,
    pub category_name: String,
    pub current_stock: i32,
    pub stock_level: StockLevel,
}

impl LowStockProduct {
    pub fn stock_text(&self) -> String {
        format!("{} units", self.current_stock)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LowStockSummary {
    pub critical_count: usize,
    pub low_count: usize,
    pub total_count: usize,
}

// ---------------------------------------------------------------------------
// DashboardSummary - Landing page cards and lists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardSummary {
    pub product_count: usize,
    pub category_count: usize,
    pub order_count: usize,
    pub total_revenue: Decimal,
    pub low_stock_products: Vec<Product>,
    pub best_sellers: Vec<BestSellingProduct>,
}
