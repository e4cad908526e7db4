//! Sales and stock aggregation over snapshots of fetched orders and products.
//!
//! Every function here is pure: it takes the lists a page loaded once and
//! returns new rows. Groups are kept in first-seen order and all sorts are
//! stable, so ties keep the order in which the grouping first met them.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, ShopError};
use crate::models::{
    BestSellingProduct, Category, DashboardSummary, LowStockProduct, LowStockSummary, Order,
    Product, ProductSales, SalesSummary, StockLevel, UNCATEGORIZED,
};

/// Products at or below this quantity appear in the dashboard stock list.
pub const DASHBOARD_LOW_STOCK_THRESHOLD: i32 = 10;

/// Upper bound (inclusive) for the low stock report.
pub const LOW_STOCK_REPORT_CEILING: i32 = 50;

/// Stock strictly below this is tagged critical in the low stock report.
pub const CRITICAL_STOCK_BELOW: i32 = 10;

/// Rows shown in the dashboard's best seller list.
pub const DASHBOARD_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// OrderWindow
// ---------------------------------------------------------------------------

/// The slice of order history a report covers. Dates are UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderWindow {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    /// Inclusive on both ends.
    Range { from: NaiveDate, to: NaiveDate },
}

impl OrderWindow {
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ShopError::InvalidArgument(format!(
                "month must be 1-12, got {}",
                month
            )));
        }
        Ok(OrderWindow::Month { year, month })
    }

    pub fn range(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(ShopError::InvalidArgument(format!(
                "range start {} is after end {}",
                from, to
            )));
        }
        Ok(OrderWindow::Range { from, to })
    }

    /// Parse a month picker entry such as `"January 2025"`.
    pub fn parse_month(label: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("01 {}", label.trim()), "%d %B %Y")
            .map_err(|_| ShopError::InvalidArgument(format!("not a month: {}", label)))?;
        Ok(OrderWindow::Month {
            year: date.year(),
            month: date.month(),
        })
    }

    pub fn contains_time(&self, time: &DateTime<Utc>) -> bool {
        let date = time.date_naive();
        match *self {
            OrderWindow::Day(day) => date == day,
            OrderWindow::Month { year, month } => date.year() == year && date.month() == month,
            OrderWindow::Range { from, to } => date >= from && date <= to,
        }
    }

    pub fn contains(&self, order: &Order) -> bool {
        self.contains_time(&order.order_time)
    }

    /// Human label used in report headers.
    pub fn label(&self) -> String {
        match *self {
            OrderWindow::Day(day) => day.format("%d %B %Y").to_string(),
            OrderWindow::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| format!("{}-{:02}", year, month)),
            OrderWindow::Range { from, to } => {
                format!("{} - {}", from.format("%d/%m/%Y"), to.format("%d/%m/%Y"))
            }
        }
    }

    /// First day covered by the window, used to stamp report file names.
    pub fn start_date(&self) -> NaiveDate {
        match *self {
            OrderWindow::Day(day) => day,
            OrderWindow::Month { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
            }
            OrderWindow::Range { from, .. } => from,
        }
    }
}

/// Orders falling inside `window`, in input order.
pub fn orders_in(window: &OrderWindow, orders: &[Order]) -> Vec<Order> {
    orders.iter().filter(|o| window.contains(o)).cloned().collect()
}

// ---------------------------------------------------------------------------
// Grouping helper
// ---------------------------------------------------------------------------

/// Groups items by key, preserving the order keys were first seen.
struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<V>,
}

impl<K: Eq + Hash, V> OrderedGroups<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.groups.push(init());
                let idx = self.groups.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.groups[idx]
    }

    fn into_vec(self) -> Vec<V> {
        self.groups
    }
}

// ---------------------------------------------------------------------------
// Best sellers
// ---------------------------------------------------------------------------

/// Rank products by units sold across `orders`, keeping the top `top_n`.
///
/// Name and category come from the product embedded in the line item, then
/// from `products` by id, then from the line snapshot. Lines with no
/// resolvable name are skipped.
pub fn best_sellers(orders: &[Order], products: &[Product], top_n: usize) -> Vec<BestSellingProduct> {
    let catalog: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut groups: OrderedGroups<Uuid, BestSellingProduct> = OrderedGroups::new();

    for item in orders.iter().flat_map(|o| o.order_items.iter()) {
        let known = item
            .product
            .as_ref()
            .or_else(|| catalog.get(&item.product_id).copied());

        let name = match known {
            Some(p) if !p.name.trim().is_empty() => p.name.clone(),
            _ => item.product_name.clone(),
        };
        if name.trim().is_empty() {
            continue;
        }
        let category = known
            .map(|p| p.category_name().to_string())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let row = groups.entry(item.product_id, || BestSellingProduct {
            product_id: item.product_id,
            product_name: name,
            category,
            total_quantity_sold: 0,
            total_revenue: Decimal::ZERO,
        });
        row.total_quantity_sold += i64::from(item.quantity);
        row.total_revenue += item.total_price;
    }

    let mut rows = groups.into_vec();
    rows.sort_by(|a, b| b.total_quantity_sold.cmp(&a.total_quantity_sold));
    rows.truncate(top_n);
    rows
}

// ---------------------------------------------------------------------------
// Sales by product
// ---------------------------------------------------------------------------

/// Per-product totals for a sales report, highest revenue first.
///
/// Lines are grouped by display name; `order_count` counts distinct orders.
pub fn product_sales(orders: &[Order]) -> Vec<ProductSales> {
    let mut groups: OrderedGroups<String, (ProductSales, HashSet<Uuid>)> = OrderedGroups::new();

    for order in orders {
        for item in &order.order_items {
            let name = item.display_name();
            if name.trim().is_empty() {
                continue;
            }
            let (row, seen) = groups.entry(name.to_string(), || {
                (
                    ProductSales {
                        product_name: name.to_string(),
                        total_quantity_sold: 0,
                        total_revenue: Decimal::ZERO,
                        order_count: 0,
                    },
                    HashSet::new(),
                )
            });
            row.total_quantity_sold += i64::from(item.quantity);
            row.total_revenue += item.total_price;
            if seen.insert(item.order_id.unwrap_or(order.id)) {
                row.order_count += 1;
            }
        }
    }

    let mut rows: Vec<ProductSales> = groups.into_vec().into_iter().map(|(row, _)| row).collect();
    rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    rows
}

/// Headline numbers: order count, revenue, average order value, items sold.
pub fn sales_summary(orders: &[Order]) -> SalesSummary {
    let order_count = orders.len();
    let total_revenue: Decimal = orders.iter().map(|o| o.total_amount).sum();
    let average_order_value = if order_count == 0 {
        Decimal::ZERO
    } else {
        (total_revenue / Decimal::from(order_count)).round_dp(2)
    };
    let items_sold = orders.iter().map(Order::item_count).sum();

    SalesSummary {
        order_count,
        total_revenue,
        average_order_value,
        items_sold,
    }
}

/// Revenue per calendar month of `year`, January first.
pub fn monthly_revenue(orders: &[Order], year: i32) -> [Decimal; 12] {
    let mut buckets = [Decimal::ZERO; 12];
    for order in orders {
        let date = order.order_time.date_naive();
        if date.year() == year {
            buckets[date.month0() as usize] += order.total_amount;
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Low stock
// ---------------------------------------------------------------------------

/// Products with stock at or below `ceiling`, lowest stock first.
///
/// Stock below `critical_below` is [`StockLevel::Critical`], the rest
/// [`StockLevel::Low`].
pub fn low_stock(products: &[Product], ceiling: i32, critical_below: i32) -> Vec<LowStockProduct> {
    let mut rows: Vec<LowStockProduct> = products
        .iter()
        .filter(|p| p.quantity <= ceiling)
        .map(|p| LowStockProduct {
            id: p.id,
            product_name: p.name.clone(),
            category_name: p.category_name().to_string(),
            current_stock: p.quantity,
            stock_level: if p.quantity < critical_below {
                StockLevel::Critical
            } else {
                StockLevel::Low
            },
        })
        .collect();
    rows.sort_by_key(|r| r.current_stock);
    rows
}

/// [`low_stock`] with the report page's thresholds.
pub fn low_stock_report_rows(products: &[Product]) -> Vec<LowStockProduct> {
    low_stock(products, LOW_STOCK_REPORT_CEILING, CRITICAL_STOCK_BELOW)
}

pub fn low_stock_summary(rows: &[LowStockProduct]) -> LowStockSummary {
    let critical_count = rows
        .iter()
        .filter(|r| r.stock_level == StockLevel::Critical)
        .count();
    LowStockSummary {
        critical_count,
        low_count: rows.len() - critical_count,
        total_count: rows.len(),
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub fn dashboard(products: &[Product], categories: &[Category], orders: &[Order]) -> DashboardSummary {
    DashboardSummary {
        product_count: products.len(),
        category_count: categories.len(),
        order_count: orders.len(),
        total_revenue: orders.iter().map(|o| o.total_amount).sum(),
        low_stock_products: products
            .iter()
            .filter(|p| p.quantity <= DASHBOARD_LOW_STOCK_THRESHOLD)
            .cloned()
            .collect(),
        best_sellers: best_sellers(orders, products, DASHBOARD_TOP_N),
    }
}
