//! Sales and stock aggregation over fetched snapshots.

mod common;

use cable_shop::models::{Category, StockLevel};
use cable_shop::report::{self, OrderWindow};
use cable_shop::ShopError;
use chrono::NaiveDate;
use common::{id, item, order, product};
use rust_decimal::Decimal;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

#[test]
fn windows_select_by_utc_date() {
    let orders = vec![
        order(1, 2025, 1, 15, vec![]),
        order(2, 2025, 1, 16, vec![]),
        order(3, 2025, 2, 1, vec![]),
        order(4, 2024, 1, 15, vec![]),
    ];

    let daily = report::orders_in(&OrderWindow::Day(day(2025, 1, 15)), &orders);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].id, id(1001));

    let january = OrderWindow::month(2025, 1).unwrap();
    assert_eq!(report::orders_in(&january, &orders).len(), 2);

    let range = OrderWindow::range(day(2025, 1, 16), day(2025, 2, 1)).unwrap();
    let ids: Vec<_> = report::orders_in(&range, &orders).iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![id(1002), id(1003)]);
}

#[test]
fn window_constructors_validate() {
    assert!(matches!(OrderWindow::month(2025, 13), Err(ShopError::InvalidArgument(_))));
    assert!(OrderWindow::range(day(2025, 2, 1), day(2025, 1, 1)).is_err());
    assert_eq!(
        OrderWindow::parse_month("March 2025").unwrap(),
        OrderWindow::Month { year: 2025, month: 3 }
    );
    assert!(OrderWindow::parse_month("Smarch 2025").is_err());
}

#[test]
fn window_labels() {
    assert_eq!(OrderWindow::Day(day(2025, 1, 5)).label(), "05 January 2025");
    assert_eq!(OrderWindow::month(2025, 3).unwrap().label(), "March 2025");
    assert_eq!(
        OrderWindow::range(day(2025, 1, 1), day(2025, 1, 31)).unwrap().label(),
        "01/01/2025 - 31/01/2025"
    );
    assert_eq!(OrderWindow::month(2025, 3).unwrap().start_date(), day(2025, 3, 1));
}

// ---------------------------------------------------------------------------
// Best sellers
// ---------------------------------------------------------------------------

#[test]
fn best_sellers_rank_by_quantity_with_stable_ties() {
    let a = product(1, "Clutch Cable", Some("Cables"), 100, 10);
    let b = product(2, "Brake Cable", Some("Brakes"), 50, 10);
    let c = product(3, "Speedo Cable", None, 70, 10);
    let orders = vec![
        order(1, 2025, 1, 1, vec![item(b.id, "Brake Cable", 3, 50), item(a.id, "Clutch Cable", 1, 100)]),
        order(2, 2025, 1, 2, vec![item(a.id, "Clutch Cable", 2, 100), item(c.id, "Speedo Cable", 1, 70)]),
    ];

    let rows = report::best_sellers(&orders, &[a.clone(), b.clone(), c.clone()], 10);
    let names: Vec<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
    // B and A tie on 3 units; B was seen first.
    assert_eq!(names, vec!["Brake Cable", "Clutch Cable", "Speedo Cable"]);
    assert_eq!(rows[1].total_revenue, Decimal::from(300));
    assert_eq!(rows[0].category, "Brakes");
    assert_eq!(rows[2].category, "Uncategorized");

    let top1 = report::best_sellers(&orders, &[a, b, c], 1);
    assert_eq!(top1.len(), 1);
}

#[test]
fn best_sellers_fall_back_to_line_snapshot_and_skip_nameless() {
    let gone = id(77);
    let orders = vec![order(
        1,
        2025,
        1,
        1,
        vec![item(gone, "Discontinued Cable", 4, 10), item(id(78), "", 9, 10)],
    )];

    let rows = report::best_sellers(&orders, &[], 10);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Discontinued Cable");
    assert_eq!(rows[0].category, "Uncategorized");
}

// ---------------------------------------------------------------------------
// Sales report rows
// ---------------------------------------------------------------------------

#[test]
fn product_sales_groups_by_name_and_counts_distinct_orders() {
    let a = id(1);
    let b = id(2);
    let orders = vec![
        order(1, 2025, 1, 1, vec![item(a, "Clutch Cable", 1, 100), item(a, "Clutch Cable", 1, 100)]),
        order(2, 2025, 1, 1, vec![item(a, "Clutch Cable", 1, 100), item(b, "Bolt", 10, 5)]),
    ];

    let rows = report::product_sales(&orders);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_name, "Clutch Cable");
    assert_eq!(rows[0].total_quantity_sold, 3);
    assert_eq!(rows[0].total_revenue, Decimal::from(300));
    assert_eq!(rows[0].order_count, 2);
    assert_eq!(rows[1].order_count, 1);

    let sum: Decimal = rows.iter().map(|r| r.total_revenue).sum();
    let lines: Decimal = orders
        .iter()
        .flat_map(|o| o.order_items.iter())
        .map(|i| i.total_price)
        .sum();
    assert_eq!(sum, lines);
}

#[test]
fn sales_summary_averages_and_handles_empty() {
    let orders = vec![
        order(1, 2025, 1, 1, vec![item(id(1), "A", 1, 100)]),
        order(2, 2025, 1, 1, vec![item(id(1), "A", 2, 100)]),
        order(3, 2025, 1, 1, vec![item(id(2), "B", 1, 1)]),
    ];
    let summary = report::sales_summary(&orders);
    assert_eq!(summary.order_count, 3);
    assert_eq!(summary.total_revenue, Decimal::from(301));
    assert_eq!(summary.average_order_value, Decimal::new(10033, 2));
    assert_eq!(summary.items_sold, 4);

    let empty = report::sales_summary(&[]);
    assert_eq!(empty.order_count, 0);
    assert_eq!(empty.average_order_value, Decimal::ZERO);
}

#[test]
fn monthly_revenue_buckets_one_year() {
    let orders = vec![
        order(1, 2025, 1, 3, vec![item(id(1), "A", 1, 100)]),
        order(2, 2025, 1, 30, vec![item(id(1), "A", 1, 50)]),
        order(3, 2025, 12, 31, vec![item(id(1), "A", 1, 7)]),
        order(4, 2024, 12, 31, vec![item(id(1), "A", 1, 1000)]),
    ];
    let months = report::monthly_revenue(&orders, 2025);
    assert_eq!(months[0], Decimal::from(150));
    assert_eq!(months[11], Decimal::from(7));
    assert_eq!(months.iter().copied().sum::<Decimal>(), Decimal::from(157));
}

// ---------------------------------------------------------------------------
// Stock
// ---------------------------------------------------------------------------

#[test]
fn low_stock_report_partitions_critical_and_low() {
    let products = vec![
        product(1, "A", Some("Cables"), 1, 45),
        product(2, "B", None, 1, 3),
        product(3, "C", None, 1, 10),
        product(4, "D", None, 1, 51),
        product(5, "E", None, 1, 0),
        product(6, "F", None, 1, 9),
        product(7, "G", None, 1, 50),
    ];
    let rows = report::low_stock_report_rows(&products);
    let names: Vec<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
    assert_eq!(names, vec!["E", "B", "F", "C", "A", "G"]);
    assert_eq!(rows[0].stock_level, StockLevel::Critical);
    assert_eq!(rows[2].stock_level, StockLevel::Critical);
    assert_eq!(rows[3].stock_level, StockLevel::Low);
    assert_eq!(rows[4].stock_text(), "45 units");
    assert_eq!(rows[4].category_name, "Cables");
    assert_eq!(rows[5].stock_level, StockLevel::Low);
    assert_eq!(rows[5].stock_text(), "50 units");

    let summary = report::low_stock_summary(&rows);
    assert_eq!(summary.critical_count, 3);
    assert_eq!(summary.low_count, 3);
    assert_eq!(summary.total_count, 6);
}

#[test]
fn dashboard_uses_ten_unit_threshold() {
    let products = vec![
        product(1, "A", None, 1, 10),
        product(2, "B", None, 1, 11),
        product(3, "C", None, 1, 5),
    ];
    let categories = vec![Category::new("Cables")];
    let orders = vec![order(1, 2025, 1, 1, vec![item(id(3), "C", 2, 1)])];

    let summary = report::dashboard(&products, &categories, &orders);
    assert_eq!(summary.product_count, 3);
    assert_eq!(summary.category_count, 1);
    assert_eq!(summary.total_revenue, Decimal::from(2));
    let low: Vec<&str> = summary.low_stock_products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(low, vec!["A", "C"]);
    assert_eq!(summary.best_sellers.len(), 1);
}
