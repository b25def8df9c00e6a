//! Plain-text offer renderer
//!
//! Lays the document out in fixed-width columns and splits it into pages.
//! Pages are separated by a form feed and end with a `Page i/n` footer.

use super::{DocumentLine, DocumentSection, OfferDocument, OfferRenderer, RenderError};
use crate::core::EngineConfig;
use crate::money::{format_currency, format_price};
use rust_decimal::Decimal;

/// Narrowest layout that still leaves room for item names
pub const MIN_DOCUMENT_WIDTH: usize = 64;

/// Header repeat + footer need a few lines of their own
const MIN_PAGE_LINES: usize = 10;

const FORM_FEED: char = '\u{c}';

// Fixed column widths; the name column takes the rest
const COL_NO: usize = 4;
const COL_QTY: usize = 8;
const COL_UNIT: usize = 6;
const COL_NET: usize = 12;
const COL_VAT: usize = 5;
const COL_GROSS: usize = 14;
const COL_GAPS: usize = 6;

fn text_width(s: &str) -> usize {
    s.chars().count()
}

fn pad_right(s: &str, width: usize) -> String {
    let w = text_width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

fn pad_left(s: &str, width: usize) -> String {
    let w = text_width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - w), s)
    }
}

/// Split `s` into chunks of at most `width` characters, on spaces when possible
fn wrap(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let mut word = word.to_string();
        while text_width(&word) > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        if current.is_empty() {
            current = word;
        } else if text_width(&current) + 1 + text_width(&word) <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Quantity without trailing zeros (`2`, `1.5`)
fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Line-oriented text builder
struct TextBuilder {
    lines: Vec<String>,
    width: usize,
}

impl TextBuilder {
    fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            width,
        }
    }

    fn line(&mut self, s: &str) -> &mut Self {
        self.lines.push(s.trim_end().to_string());
        self
    }

    fn newline(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    fn center(&mut self, s: &str) -> &mut Self {
        let w = text_width(s);
        let indent = self.width.saturating_sub(w) / 2;
        self.line(&format!("{}{}", " ".repeat(indent), s))
    }

    fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    /// Left and right text on the same line
    fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width(left);
        let rw = text_width(right);
        if lw + rw >= self.width {
            self.line(&format!("{} {}", left, right))
        } else {
            self.line(&format!("{}{}{}", left, " ".repeat(self.width - lw - rw), right))
        }
    }

    fn build(self) -> Vec<String> {
        self.lines
    }
}

/// Fixed-width text renderer for offers
pub struct TextOfferRenderer {
    width: usize,
    page_lines: usize,
    currency_symbol: String,
}

impl TextOfferRenderer {
    pub fn new(width: usize, page_lines: usize, currency_symbol: impl Into<String>) -> Self {
        Self {
            width,
            page_lines,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.document_width,
            config.document_page_lines,
            config.currency_symbol.clone(),
        )
    }

    fn name_width(&self) -> usize {
        self.width - (COL_NO + COL_QTY + COL_UNIT + COL_NET + COL_VAT + COL_GROSS + COL_GAPS)
    }

    fn money(&self, value: Decimal) -> String {
        format_currency(value, &self.currency_symbol)
    }

    fn render_header(&self, b: &mut TextBuilder, doc: &OfferDocument) {
        if let Some(card) = &doc.business_card {
            if !card.company.trim().is_empty() {
                b.center(card.company.trim());
            }
            if !card.full_name.trim().is_empty() {
                b.center(card.full_name.trim());
            }
            let contact: Vec<&str> = [card.phone.trim(), card.email.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            if !contact.is_empty() {
                b.center(&contact.join(" | "));
            }
            b.newline();
        }

        b.sep_double();
        let title = if doc.title.trim().is_empty() {
            "OFFER".to_string()
        } else {
            format!("OFFER: {}", doc.title.trim())
        };
        b.line_lr(&title, &doc.issued_on.format("%Y-%m-%d").to_string());
        b.sep_double();
    }

    fn column_header(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            pad_right("No.", COL_NO),
            pad_right("Name", self.name_width()),
            pad_left("Qty", COL_QTY),
            pad_right("Unit", COL_UNIT),
            pad_left("Net price", COL_NET),
            pad_left("VAT", COL_VAT),
            pad_left("Gross value", COL_GROSS),
        )
    }

    fn render_section(&self, b: &mut TextBuilder, section: &DocumentSection) {
        b.newline();
        b.line(&format!("[{}]", section.category));
        b.line(&self.column_header());
        b.sep_single();
        for line in &section.lines {
            self.render_line(b, line);
        }
        b.sep_single();
        b.line_lr("", &format!("Subtotal: {}", self.money(section.total_gross)));
    }

    fn render_line(&self, b: &mut TextBuilder, line: &DocumentLine) {
        let name_width = self.name_width();
        let name_lines = wrap(&line.name, name_width);
        let (first, rest) = name_lines.split_first().map_or(("", &[][..]), |(f, r)| (f.as_str(), r));

        b.line(&format!(
            "{} {} {} {} {} {} {}",
            pad_left(&format!("{}.", line.position), COL_NO),
            pad_right(first, name_width),
            pad_left(&format_quantity(line.quantity), COL_QTY),
            pad_right(&line.unit, COL_UNIT),
            pad_left(&format_price(line.sale_price_net), COL_NET),
            pad_left(&format!("{}%", line.vat_rate.normalize()), COL_VAT),
            pad_left(&format_price(line.total_gross), COL_GROSS),
        ));
        for continuation in rest {
            b.line(&format!("{} {}", " ".repeat(COL_NO), continuation));
        }
    }

    fn render_summary(&self, b: &mut TextBuilder, doc: &OfferDocument) {
        b.newline();
        b.sep_double();
        b.line_lr("Total net:", &self.money(doc.totals.total_net));
        b.line_lr("Total VAT:", &self.money(doc.totals.total_vat));
        b.line_lr("Total gross:", &self.money(doc.totals.total_gross));
        b.sep_double();
        b.line(&doc.totals.items_info());
    }

    /// Split body lines into pages with a footer each
    fn paginate(&self, body: Vec<String>) -> String {
        // blank + footer
        let per_page = self.page_lines - 2;
        let pages: Vec<&[String]> = body.chunks(per_page).collect();
        let count = pages.len();

        let mut out = String::new();
        for (index, page) in pages.iter().enumerate() {
            if index > 0 {
                out.push(FORM_FEED);
            }
            for line in page.iter() {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&pad_left(&format!("Page {}/{}", index + 1, count), self.width));
            out.push('\n');
        }
        out
    }
}

impl Default for TextOfferRenderer {
    fn default() -> Self {
        Self::new(80, 60, "zł")
    }
}

impl OfferRenderer for TextOfferRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &OfferDocument) -> Result<Vec<u8>, RenderError> {
        if self.width < MIN_DOCUMENT_WIDTH {
            return Err(RenderError::WidthTooSmall {
                width: self.width,
                min: MIN_DOCUMENT_WIDTH,
            });
        }
        if self.page_lines < MIN_PAGE_LINES {
            return Err(RenderError::PageTooShort {
                lines: self.page_lines,
                min: MIN_PAGE_LINES,
            });
        }
        if document.is_empty() {
            return Err(RenderError::EmptyDocument);
        }

        let mut b = TextBuilder::new(self.width);
        self.render_header(&mut b, document);
        for section in &document.sections {
            self.render_section(&mut b, section);
        }
        self.render_summary(&mut b, document);

        let text = self.paginate(b.build());
        tracing::debug!(
            lines = document.line_count(),
            bytes = text.len(),
            "Offer document rendered"
        );
        Ok(text.into_bytes())
    }
}
