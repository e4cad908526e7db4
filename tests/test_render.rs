//! Report layout, pagination and PDF output.

mod common;

use cable_shop::models::{LowStockProduct, ProductSales, SalesSummary, StockLevel};
use cable_shop::render::{self, document, Branding, PageCapacity, ReportRenderer};
use cable_shop::report::OrderWindow;
use cable_shop::{ShopConfig, ShopError};
use chrono::{NaiveDate, NaiveDateTime};
use common::{id, item, order};
use rust_decimal::Decimal;

fn generated() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 3)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap()
}

fn sales_rows(n: usize) -> Vec<ProductSales> {
    (0..n)
        .map(|i| ProductSales {
            product_name: format!("Cable {}", i),
            total_quantity_sold: 2,
            total_revenue: Decimal::from(1000),
            order_count: 1,
        })
        .collect()
}

fn low_row(n: u128, name: &str, stock: i32, level: StockLevel) -> LowStockProduct {
    LowStockProduct {
        id: id(n),
        product_name: name.to_string(),
        category_name: "Cables".to_string(),
        current_stock: stock,
        stock_level: level,
    }
}

fn renderer(dir: &std::path::Path) -> ReportRenderer {
    ReportRenderer::new(dir, Branding::default())
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[test]
fn pagination_covers_every_row_once() {
    let window = OrderWindow::month(2025, 1).unwrap();
    let doc = document::sales_report(
        &window,
        &sales_rows(70),
        &SalesSummary::default(),
        &Branding::default(),
        generated(),
    );
    let capacity = PageCapacity {
        first_page_rows: 20,
        rows_per_page: 30,
    };

    let pages = doc.paginate(capacity);
    assert_eq!(pages[0], 0..20);
    assert_eq!(pages[1], 20..50);
    assert_eq!(pages[2], 50..70);
    assert_eq!(pages.len(), 3);
    let covered: usize = pages.iter().map(|r| r.len()).sum();
    assert_eq!(covered, 70);
}

#[test]
fn trailing_blocks_spill_onto_an_extra_page() {
    let window = OrderWindow::month(2025, 1).unwrap();
    let doc = document::sales_report(
        &window,
        &sales_rows(29),
        &SalesSummary::default(),
        &Branding::default(),
        generated(),
    );
    // 29 rows + totals row + note (2) do not fit in 30.
    let pages = doc.paginate(PageCapacity {
        first_page_rows: 30,
        rows_per_page: 30,
    });
    assert_eq!(pages, vec![0..29, 29..29]);
}

#[test]
fn empty_document_still_has_one_page() {
    let doc = document::low_stock_report(&[], &Branding::default(), generated());
    assert_eq!(doc.paginate(PageCapacity::default()), vec![0..0]);
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

#[test]
fn invoice_lists_items_and_totals() {
    let mut o = order(
        1,
        2025,
        1,
        15,
        vec![item(id(1), "Clutch Cable", 2, 1500), item(id(2), "Bolt", 10, 5)],
    );
    o.discount = Decimal::from(50);
    o.total_amount = o.sub_total - o.discount;

    let doc = document::invoice(&o, &Branding::default(), generated());
    assert_eq!(doc.title, "Sales Order Invoice");
    assert_eq!(doc.rows.len(), 2);
    assert_eq!(doc.rows[0], vec!["1", "Clutch Cable", "2", "1,500.00", "3,000.00"]);
    assert_eq!(
        doc.totals_block,
        vec![
            ("Subtotal:".to_string(), "Rs. 3,050.00".to_string()),
            ("Discount:".to_string(), "- Rs. 50.00".to_string()),
            ("Total Amount:".to_string(), "Rs. 3,000.00".to_string()),
        ]
    );
    assert!(doc.meta.contains(&("Status".to_string(), "Completed".to_string())));
    assert!(doc.meta.contains(&("Order Date".to_string(), "15/01/2025 12:00".to_string())));
}

#[test]
fn sales_report_has_summary_and_totals_row() {
    let window = OrderWindow::Day(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    let summary = SalesSummary {
        order_count: 4,
        total_revenue: Decimal::from(3000),
        average_order_value: Decimal::from(750),
        items_sold: 6,
    };
    let doc = document::sales_report(&window, &sales_rows(3), &summary, &Branding::default(), generated());

    assert_eq!(doc.title, "Daily Sales Report");
    assert_eq!(doc.summary.len(), 4);
    assert_eq!(doc.summary[1].value, "Rs. 3,000.00");
    assert_eq!(
        doc.totals_row,
        Some(vec![
            "TOTAL".to_string(),
            String::new(),
            "6".to_string(),
            "3,000.00".to_string(),
            String::new(),
        ])
    );
    assert_eq!(doc.footer, "CABLE SHOP - Confidential Report");
    assert!(doc.meta.contains(&("Report Period".to_string(), "05 January 2025".to_string())));
}

#[test]
fn low_stock_report_puts_critical_first() {
    let rows = vec![
        low_row(1, "Low One", 20, StockLevel::Low),
        low_row(2, "Critical One", 2, StockLevel::Critical),
        low_row(3, "Low Two", 30, StockLevel::Low),
        low_row(4, "Critical Two", 9, StockLevel::Critical),
    ];
    let doc = document::low_stock_report(&rows, &Branding::default(), generated());

    let names: Vec<&str> = doc.rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(names, vec!["Critical One", "Critical Two", "Low One", "Low Two"]);
    assert_eq!(doc.rows[0][3], "2 units");
    assert_eq!(doc.summary[0].value, "2");
    assert_eq!(doc.summary[1].caption.as_deref(), Some("10-50 units"));
    assert_eq!(doc.summary[2].value, "4");
}

// ---------------------------------------------------------------------------
// PDF output
// ---------------------------------------------------------------------------

#[test]
fn renders_invoice_pdf_to_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let o = order(1, 2025, 1, 15, vec![item(id(1), "Câble d'embrayage", 2, 1500)]);

    let path = renderer(tmp.path()).render_invoice(&o).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(&format!("Invoice_{}_", o.id)));
    assert!(name.ends_with(".pdf"));

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn renders_multi_page_sales_report() {
    let tmp = tempfile::tempdir().unwrap();
    let window = OrderWindow::month(2025, 1).unwrap();
    let rows = sales_rows(120);

    let path = renderer(tmp.path())
        .render_sales_report(&window, &rows, &SalesSummary::default())
        .unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("SalesReport_20250101_"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));

    // No stray temp files next to the report.
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn renders_low_stock_report_into_new_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested").join("reports");
    let rows = vec![low_row(1, "Brake Cable", 3, StockLevel::Critical)];

    let path = renderer(&dir).render_low_stock_report(&rows).unwrap();
    assert!(path.starts_with(&dir));
    assert!(path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("LowStockReport_"));
}

#[test]
fn empty_reports_are_refused_without_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let r = renderer(tmp.path());
    let window = OrderWindow::month(2025, 1).unwrap();

    let err = r
        .render_sales_report(&window, &[], &SalesSummary::default())
        .unwrap_err();
    assert!(matches!(err, ShopError::Validation(_)));
    assert_eq!(err.user_message(), "No sales data available for the selected period.");

    let err = r.render_low_stock_report(&[]).unwrap_err();
    assert_eq!(err.user_message(), "There are no low stock items to generate a report.");
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn renderer_takes_branding_and_dir_from_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ShopConfig {
        report_dir: Some(tmp.path().to_path_buf()),
        business_name: "TOYO CABLE".into(),
        currency_prefix: "LKR".into(),
        ..ShopConfig::default()
    };
    let r = ReportRenderer::from_config(&config);
    assert_eq!(r.output_dir(), tmp.path());
    assert_eq!(r.branding().business_name, "TOYO CABLE");

    let doc = document::invoice(&order(1, 2025, 1, 1, vec![]), r.branding(), generated());
    assert_eq!(doc.totals_block[2].1, "LKR 0.00");
    assert_eq!(doc.paginate(PageCapacity::default()).len(), 1);
}

#[test]
fn open_in_viewer_rejects_missing_file() {
    let err = render::open_in_viewer(std::path::Path::new("/definitely/not/here.pdf")).unwrap_err();
    assert!(matches!(err, ShopError::NotFound(_)));
}
