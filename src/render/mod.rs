//! Printable invoices and sales/stock reports.
//!
//! Layout lives in [`document`]; [`pdf`] turns a laid-out document into PDF
//! bytes. [`ReportRenderer`] names the file, writes it into the report
//! directory and hands back the path for the OS viewer.

pub mod document;
pub mod pdf;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ShopConfig;
use crate::error::{Result, ShopError};
use crate::models::{LowStockProduct, Order, ProductSales, SalesSummary};
use crate::report::OrderWindow;

pub use document::{Align, Branding, Column, PageCapacity, ReportDocument, SummaryCard};

/// Format an amount with thousands separators and two decimals,
/// e.g. `1234.5` becomes `"1,234.50"`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (digits.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = format!("{:0<2}", frac_part);
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, &frac[..2])
}

// ---------------------------------------------------------------------------
// ReportRenderer
// ---------------------------------------------------------------------------

/// Writes rendered PDFs into a report directory.
pub struct ReportRenderer {
    output_dir: PathBuf,
    branding: Branding,
    capacity: PageCapacity,
}

impl ReportRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P, branding: Branding) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            branding,
            capacity: PageCapacity::default(),
        }
    }

    pub fn from_config(config: &ShopConfig) -> Self {
        Self::new(
            config.report_dir(),
            Branding {
                business_name: config.business_name.clone(),
                currency_prefix: config.currency_prefix.clone(),
            },
        )
    }

    /// Override how many table rows go on each page.
    pub fn with_capacity(mut self, capacity: PageCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Render the invoice for a placed order.
    pub fn render_invoice(&self, order: &Order) -> Result<PathBuf> {
        let now = Self::now();
        let doc = document::invoice(order, &self.branding, now);
        let name = format!("Invoice_{}_{}.pdf", order.id, now.format("%Y%m%d_%H%M%S"));
        self.render_document(&doc, &name)
    }

    /// Render a sales report. Refuses to print an empty report.
    pub fn render_sales_report(
        &self,
        window: &OrderWindow,
        rows: &[ProductSales],
        summary: &SalesSummary,
    ) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(ShopError::Validation(
                "No sales data available for the selected period.".to_string(),
            ));
        }
        let now = Self::now();
        let doc = document::sales_report(window, rows, summary, &self.branding, now);
        let name = format!(
            "SalesReport_{}_{}.pdf",
            window.start_date().format("%Y%m%d"),
            now.format("%H%M%S")
        );
        self.render_document(&doc, &name)
    }

    /// Render the low stock alert report. Refuses to print an empty report.
    pub fn render_low_stock_report(&self, rows: &[LowStockProduct]) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(ShopError::Validation(
                "There are no low stock items to generate a report.".to_string(),
            ));
        }
        let now = Self::now();
        let doc = document::low_stock_report(rows, &self.branding, now);
        let name = format!("LowStockReport_{}.pdf", now.format("%Y%m%d_%H%M%S"));
        self.render_document(&doc, &name)
    }

    /// Render any document under `file_name` in the report directory.
    ///
    /// Writes to a temp file first and persists it into place, so a failed
    /// render never leaves a truncated PDF behind. An existing file with the
    /// same name is replaced.
    pub fn render_document(&self, doc: &ReportDocument, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let bytes = pdf::render(doc, self.capacity)?;

        let dest = self.output_dir.join(file_name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.output_dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(&dest).map_err(|e| ShopError::Io(e.error))?;

        tracing::info!(path = %dest.display(), bytes = bytes.len(), "report rendered");
        Ok(dest)
    }
}

/// Open a rendered file with the platform's default viewer.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ShopError::NotFound(format!("{} does not exist", path.display())));
    }

    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = std::process::Command::new("open");
        c.arg(path);
        c
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut cmd = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(path);
        c
    };

    cmd.spawn()?;
    Ok(())
}
