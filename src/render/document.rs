//! Paginated report layout, independent of the output format.
//!
//! A [`ReportDocument`] is a header block, optional summary cards, one table
//! and optional trailing blocks (totals, note). The table header repeats on
//! every page and the footer carries "Page X of Y".

use std::ops::Range;

use chrono::NaiveDateTime;

use crate::models::{LowStockProduct, Order, ProductSales, SalesSummary, StockLevel};
use crate::report::{OrderWindow, CRITICAL_STOCK_BELOW, LOW_STOCK_REPORT_CEILING};

use super::format_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    /// Relative width; columns share the printable width in proportion.
    pub width: f32,
    pub align: Align,
}

impl Column {
    fn new(header: impl Into<String>, width: f32, align: Align) -> Self {
        Self {
            header: header.into(),
            width,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
    pub caption: Option<String>,
}

impl SummaryCard {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            caption: None,
        }
    }

    fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Business name and currency used across every document.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub business_name: String,
    pub currency_prefix: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            business_name: crate::config::DEFAULT_BUSINESS_NAME.to_string(),
            currency_prefix: crate::config::DEFAULT_CURRENCY_PREFIX.to_string(),
        }
    }
}

impl Branding {
    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format!("{} {}", self.currency_prefix, format_money(amount))
    }
}

/// How many table rows fit on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCapacity {
    /// Rows on the first page, after the header and summary cards.
    pub first_page_rows: usize,
    /// Rows on each following page.
    pub rows_per_page: usize,
}

impl Default for PageCapacity {
    fn default() -> Self {
        Self {
            first_page_rows: 24,
            rows_per_page: 34,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub branding: Branding,
    pub title: String,
    pub meta: Vec<(String, String)>,
    pub summary_title: Option<String>,
    pub summary: Vec<SummaryCard>,
    pub table_title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub totals_row: Option<Vec<String>>,
    /// Shown in place of the table when there are no rows.
    pub empty_message: String,
    /// Label/value pairs printed under the table (invoice totals).
    pub totals_block: Vec<(String, String)>,
    pub note: Option<String>,
    pub footer: String,
}

impl ReportDocument {
    /// Table rows needed after the last data row for totals and note.
    fn trailing_rows(&self) -> usize {
        let mut rows = self.totals_block.len();
        if self.totals_row.is_some() {
            rows += 1;
        }
        if self.note.is_some() {
            rows += 2;
        }
        rows
    }

    /// Split the table rows across pages.
    ///
    /// Always yields at least one page. When the trailing blocks do not fit
    /// after the last rows, an extra page with no rows is added for them.
    pub fn paginate(&self, capacity: PageCapacity) -> Vec<Range<usize>> {
        let first = capacity.first_page_rows.max(1);
        let rest = capacity.rows_per_page.max(1);

        let mut pages = Vec::new();
        let mut start = 0;
        let mut page_capacity = first;
        while start < self.rows.len() {
            let end = (start + page_capacity).min(self.rows.len());
            pages.push(start..end);
            start = end;
            page_capacity = rest;
        }
        if pages.is_empty() {
            pages.push(0..0);
        }

        let last_capacity = if pages.len() == 1 { first } else { rest };
        let last_used = pages.last().map(|r| r.len()).unwrap_or(0);
        if last_used + self.trailing_rows() > last_capacity {
            let end = self.rows.len();
            pages.push(end..end);
        }
        pages
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Invoice for a single placed order.
pub fn invoice(order: &Order, branding: &Branding, generated: NaiveDateTime) -> ReportDocument {
    let status = order.status();
    let rows = order
        .order_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                item.display_name().to_string(),
                item.quantity.to_string(),
                format_money(item.unit_price),
                format_money(item.total_price),
            ]
        })
        .collect();

    ReportDocument {
        branding: branding.clone(),
        title: "Sales Order Invoice".to_string(),
        meta: vec![
            ("Date".to_string(), generated.format("%d/%m/%Y").to_string()),
            ("Order ID".to_string(), order.id.to_string()),
            (
                "Order Date".to_string(),
                order.order_time.format("%d/%m/%Y %H:%M").to_string(),
            ),
            ("Status".to_string(), status.label().to_string()),
        ],
        summary_title: None,
        summary: Vec::new(),
        table_title: Some("Order Items".to_string()),
        columns: vec![
            Column::new("#", 0.5, Align::Left),
            Column::new("Product Name", 3.0, Align::Left),
            Column::new("Quantity", 1.0, Align::Center),
            Column::new(format!("Unit Price ({})", branding.currency_prefix), 1.5, Align::Right),
            Column::new(format!("Total ({})", branding.currency_prefix), 1.5, Align::Right),
        ],
        rows,
        totals_row: None,
        empty_message: "This order has no items.".to_string(),
        totals_block: vec![
            ("Subtotal:".to_string(), branding.money(order.sub_total)),
            ("Discount:".to_string(), format!("- {}", branding.money(order.discount))),
            ("Total Amount:".to_string(), branding.money(order.total_amount)),
        ],
        note: None,
        footer: "Thank you for your business!".to_string(),
    }
}

/// Sales report for a day, month or date range.
pub fn sales_report(
    window: &OrderWindow,
    rows: &[ProductSales],
    summary: &SalesSummary,
    branding: &Branding,
    generated: NaiveDateTime,
) -> ReportDocument {
    let title = match window {
        OrderWindow::Day(_) => "Daily Sales Report",
        OrderWindow::Month { .. } => "Monthly Sales Report",
        OrderWindow::Range { .. } => "Sales Report",
    };

    let total_qty: i64 = rows.iter().map(|r| r.total_quantity_sold).sum();
    let total_rev: rust_decimal::Decimal = rows.iter().map(|r| r.total_revenue).sum();

    let table_rows = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.product_name.clone(),
                r.total_quantity_sold.to_string(),
                format_money(r.total_revenue),
                r.order_count.to_string(),
            ]
        })
        .collect();

    ReportDocument {
        branding: branding.clone(),
        title: title.to_string(),
        meta: vec![
            ("Report Period".to_string(), window.label()),
            ("Generated".to_string(), generated.format("%d/%m/%Y %H:%M").to_string()),
        ],
        summary_title: Some("Summary".to_string()),
        summary: vec![
            SummaryCard::new("Total Orders", summary.order_count.to_string()),
            SummaryCard::new("Total Revenue", branding.money(summary.total_revenue)),
            SummaryCard::new("Avg Order Value", branding.money(summary.average_order_value)),
            SummaryCard::new("Items Sold", summary.items_sold.to_string()),
        ],
        table_title: Some("Top Selling Products".to_string()),
        columns: vec![
            Column::new("Rank", 0.6, Align::Left),
            Column::new("Product Name", 3.0, Align::Left),
            Column::new("Qty Sold", 1.0, Align::Center),
            Column::new(format!("Revenue ({})", branding.currency_prefix), 1.5, Align::Right),
            Column::new("Orders", 1.0, Align::Center),
        ],
        rows: table_rows,
        totals_row: Some(vec![
            "TOTAL".to_string(),
            String::new(),
            total_qty.to_string(),
            format_money(total_rev),
            String::new(),
        ]),
        empty_message: "No sales data available".to_string(),
        totals_block: Vec::new(),
        note: Some(
            "This report contains confidential information for internal use only.".to_string(),
        ),
        footer: format!("{} - Confidential Report", branding.business_name),
    }
}

/// Low stock alert report. Critical rows come first, then low rows, each
/// group keeping its incoming order.
pub fn low_stock_report(
    rows: &[LowStockProduct],
    branding: &Branding,
    generated: NaiveDateTime,
) -> ReportDocument {
    let (critical, low): (Vec<&LowStockProduct>, Vec<&LowStockProduct>) = rows
        .iter()
        .partition(|r| r.stock_level == StockLevel::Critical);

    let table_rows = critical
        .iter()
        .chain(low.iter())
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.product_name.clone(),
                r.category_name.clone(),
                r.stock_text(),
                r.stock_level.label().to_string(),
            ]
        })
        .collect();

    ReportDocument {
        branding: branding.clone(),
        title: "Low Stock Alert Report".to_string(),
        meta: vec![(
            "Generated".to_string(),
            generated.format("%d/%m/%Y %H:%M").to_string(),
        )],
        summary_title: Some("Stock Alert Summary".to_string()),
        summary: vec![
            SummaryCard::new("CRITICAL STOCK", critical.len().to_string())
                .caption(format!("Below {} units", CRITICAL_STOCK_BELOW)),
            SummaryCard::new("LOW STOCK", low.len().to_string())
                .caption(format!("{}-{} units", CRITICAL_STOCK_BELOW, LOW_STOCK_REPORT_CEILING)),
            SummaryCard::new("TOTAL ITEMS", rows.len().to_string()).caption("Need attention"),
        ],
        table_title: Some("Products Requiring Attention".to_string()),
        columns: vec![
            Column::new("#", 0.5, Align::Left),
            Column::new("Product Name", 3.0, Align::Left),
            Column::new("Category", 2.0, Align::Left),
            Column::new("Current Stock", 1.3, Align::Center),
            Column::new("Level", 1.0, Align::Center),
        ],
        rows: table_rows,
        totals_row: None,
        empty_message: "There are no low stock items.".to_string(),
        totals_block: Vec::new(),
        note: Some(
            "This report is confidential and intended for internal use only.".to_string(),
        ),
        footer: format!("Generated by {} Inventory System", branding.business_name),
    }
}
