//! A4 PDF output for [`ReportDocument`] using printpdf's built-in Helvetica.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb,
};

use crate::error::{Result, ShopError};

use super::document::{Align, PageCapacity, ReportDocument};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 6.5;
const BODY_SIZE: f32 = 9.0;
const FOOTER_Y: f32 = 10.0;

/// Points to millimetres.
const PT_MM: f32 = 0.3528;

fn blue() -> Color {
    Color::Rgb(Rgb::new(0.08, 0.40, 0.75, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Approximate Helvetica advance width; good enough for alignment.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52 * PT_MM
}

/// Built-in fonts only cover WinAnsi; replace anything else.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Cut `text` so it fits in `width` millimetres, marking the cut with "...".
fn fit(text: &str, width: f32, size: f32) -> String {
    let safe = pdf_safe(text);
    if text_width(&safe, size) <= width {
        return safe;
    }
    let per_char = size * 0.52 * PT_MM;
    let max_chars = ((width / per_char) as usize).saturating_sub(3);
    let cut: String = safe.chars().take(max_chars).collect();
    format!("{}...", cut)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct Cursor<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool, color: Color) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.set_fill_color(color);
        self.layer
            .use_text(pdf_safe(text), size, Mm(x), Mm(self.y), font);
    }

    fn aligned(&self, text: &str, size: f32, x: f32, width: f32, align: Align, bold: bool) {
        let text = fit(text, width - 2.0, size);
        let w = text_width(&text, size);
        let x = match align {
            Align::Left => x + 1.0,
            Align::Center => x + (width - w) / 2.0,
            Align::Right => x + width - w - 1.0,
        };
        self.text(&text, size, x, bold, black());
    }

    fn down(&mut self, mm: f32) {
        self.y -= mm;
    }
}

/// Render `doc` to PDF bytes.
pub fn render(doc: &ReportDocument, capacity: PageCapacity) -> Result<Vec<u8>> {
    let pages = doc.paginate(capacity);
    let total_pages = pages.len();

    let (pdf, first_page, first_layer) = PdfDocument::new(
        pdf_safe(&doc.title),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1".to_string(),
    );
    let fonts = Fonts {
        regular: pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ShopError::Render(e.to_string()))?,
        bold: pdf
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ShopError::Render(e.to_string()))?,
    };

    let printable = PAGE_WIDTH - 2.0 * MARGIN;
    let weight: f32 = doc.columns.iter().map(|c| c.width).sum::<f32>().max(f32::EPSILON);
    let widths: Vec<f32> = doc
        .columns
        .iter()
        .map(|c| printable * c.width / weight)
        .collect();

    for (page_no, rows) in pages.iter().enumerate() {
        let layer = if page_no == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            pdf.get_page(page).get_layer(layer)
        };
        let mut cur = Cursor {
            layer,
            fonts: &fonts,
            y: PAGE_HEIGHT - MARGIN - 5.0,
        };

        // Header block
        cur.text(&doc.branding.business_name, 20.0, MARGIN, true, blue());
        cur.down(7.0);
        cur.text(&doc.title, 13.0, MARGIN, false, grey());
        cur.down(6.0);
        if page_no == 0 {
            for (label, value) in &doc.meta {
                cur.text(&format!("{}: {}", label, value), BODY_SIZE, MARGIN, false, black());
                cur.down(4.5);
            }
            cur.down(4.0);

            if !doc.summary.is_empty() {
                if let Some(title) = &doc.summary_title {
                    cur.text(title, 12.0, MARGIN, true, blue());
                    cur.down(6.0);
                }
                let card_width = printable / doc.summary.len() as f32;
                for (i, card) in doc.summary.iter().enumerate() {
                    let x = MARGIN + i as f32 * card_width;
                    cur.text(&fit(&card.label, card_width, 8.0), 8.0, x, false, grey());
                }
                cur.down(6.0);
                for (i, card) in doc.summary.iter().enumerate() {
                    let x = MARGIN + i as f32 * card_width;
                    cur.text(&fit(&card.value, card_width, 13.0), 13.0, x, true, blue());
                }
                cur.down(4.5);
                for (i, card) in doc.summary.iter().enumerate() {
                    if let Some(caption) = &card.caption {
                        let x = MARGIN + i as f32 * card_width;
                        cur.text(&fit(caption, card_width, 7.0), 7.0, x, false, grey());
                    }
                }
                cur.down(8.0);
            }
        } else {
            cur.down(2.0);
        }

        // Table
        if let Some(title) = &doc.table_title {
            cur.text(title, 12.0, MARGIN, true, black());
            cur.down(ROW_HEIGHT + 1.0);
        }

        if doc.rows.is_empty() {
            cur.text(&doc.empty_message, 10.0, MARGIN, false, grey());
            cur.down(ROW_HEIGHT);
        } else if !rows.is_empty() {
            let mut x = MARGIN;
            for (col, width) in doc.columns.iter().zip(&widths) {
                cur.aligned(&col.header, BODY_SIZE, x, *width, col.align, true);
                x += width;
            }
            cur.down(ROW_HEIGHT);

            for row in &doc.rows[rows.clone()] {
                let mut x = MARGIN;
                for ((cell, col), width) in row.iter().zip(&doc.columns).zip(&widths) {
                    cur.aligned(cell, BODY_SIZE, x, *width, col.align, false);
                    x += width;
                }
                cur.down(ROW_HEIGHT);
            }
        }

        // Trailing blocks on the last page
        if page_no + 1 == total_pages {
            if let Some(totals) = &doc.totals_row {
                if !doc.rows.is_empty() {
                    let mut x = MARGIN;
                    for ((cell, col), width) in totals.iter().zip(&doc.columns).zip(&widths) {
                        cur.aligned(cell, BODY_SIZE, x, *width, col.align, true);
                        x += width;
                    }
                    cur.down(ROW_HEIGHT);
                }
            }

            for (label, value) in &doc.totals_block {
                let value_x = PAGE_WIDTH - MARGIN - 45.0;
                cur.text(label, 10.0, value_x - 35.0, true, black());
                cur.aligned(value, 10.0, value_x, 45.0, Align::Right, true);
                cur.down(ROW_HEIGHT);
            }

            if let Some(note) = &doc.note {
                cur.down(ROW_HEIGHT);
                cur.text(note, 8.0, MARGIN, false, grey());
            }
        }

        // Footer
        cur.y = FOOTER_Y;
        let footer = format!("{} | Page {} of {}", doc.footer, page_no + 1, total_pages);
        let footer = pdf_safe(&footer);
        let x = (PAGE_WIDTH - text_width(&footer, 8.0)) / 2.0;
        cur.text(&footer, 8.0, x, false, grey());
    }

    pdf.save_to_bytes()
        .map_err(|e| ShopError::Render(e.to_string()))
}
