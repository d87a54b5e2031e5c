//! Single-page PDF table export.
//!
//! Builds a PDF 1.4 document in memory with the two standard Type 1 fonts
//! (Helvetica, Helvetica-Bold), so no font files are embedded. The table is
//! centred on a US Letter page below an optional title block.

use std::fmt::Write as _;
use std::io::Write as _;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::error::TsvYieldError;
use crate::export::format_2dp;
use crate::yield_calc::YieldMetrics;
use crate::TsvYieldResult;

// ---------------------------------------------------------------------------
// Page geometry and table style
// ---------------------------------------------------------------------------

pub const LETTER_WIDTH: f64 = 612.0;
pub const LETTER_HEIGHT: f64 = 792.0;
const PAGE_MARGIN: f64 = 72.0;

const FONT_SIZE: f64 = 10.0;
const LEADING: f64 = 12.0;
const PAD_X: f64 = 6.0;
const PAD_TOP: f64 = 3.0;
const PAD_BOTTOM: f64 = 3.0;
const HEADER_PAD_BOTTOM: f64 = 12.0;
const GRID_WIDTH: f64 = 1.0;

const TITLE_SIZE: f64 = 16.0;
const SUBTITLE_SIZE: f64 = 9.0;

#[derive(Debug, Clone, Copy)]
struct Rgb(f64, f64, f64);

const GREY: Rgb = Rgb(0.502, 0.502, 0.502);
const WHITESMOKE: Rgb = Rgb(0.961, 0.961, 0.961);
const BEIGE: Rgb = Rgb(0.961, 0.961, 0.863);
const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

impl Rgb {
    /// Non-stroking colour operator.
    fn fill(self) -> String {
        format!("{:.3} {:.3} {:.3} rg", self.0, self.1, self.2)
    }

    /// Stroking colour operator.
    fn stroke(self) -> String {
        format!("{:.3} {:.3} {:.3} RG", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "/F1",
            Font::Bold => "/F2",
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Presentation options for [`to_pdf`].
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub title: Option<String>,
    /// Printed under the title and recorded as the creation date.
    pub generated_on: Option<NaiveDate>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: Some("Yield Calculation Results".to_string()),
            generated_on: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// PDF table builder
///
/// Collects a header row and body rows, then renders a complete document.
#[derive(Debug, Default)]
pub struct PdfTableBuilder {
    title: Option<String>,
    generated_on: Option<NaiveDate>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl PdfTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn generated_on(&mut self, date: NaiveDate) -> &mut Self {
        self.generated_on = Some(date);
        self
    }

    /// Set the header row (bold on a grey band).
    pub fn header<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = cells.into_iter().map(Into::into).collect();
        self
    }

    /// Append a body row.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Render the finished document.
    pub fn render(&self) -> TsvYieldResult<Vec<u8>> {
        let content = self.content_stream()?;
        let info = self.info_dictionary();

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>",
                LETTER_WIDTH, LETTER_HEIGHT
            ),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
            info,
        ];

        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(buf.len());
            write!(buf, "{} 0 obj\n{}\nendobj\n", i + 1, body)?;
        }

        let xref_offset = buf.len();
        write!(buf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
        for offset in &offsets {
            write!(buf, "{:010} 00000 n \n", offset)?;
        }
        write!(
            buf,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            objects.len(),
            xref_offset
        )?;

        debug!(bytes = buf.len(), rows = self.rows.len(), "rendered pdf table");
        Ok(buf)
    }

    fn info_dictionary(&self) -> String {
        let mut info = String::from("<< /Producer (tsv-yield)");
        if let Some(title) = &self.title {
            let _ = write!(info, " /Title ({})", escape_text(title));
        }
        if let Some(date) = self.generated_on {
            let _ = write!(info, " /CreationDate (D:{})", date.format("%Y%m%d"));
        }
        info.push_str(" >>");
        info
    }

    fn content_stream(&self) -> TsvYieldResult<String> {
        if self.header.is_empty() {
            return Err(TsvYieldError::Export("PDF table has no header row".into()));
        }
        let columns = self.header.len();
        if let Some(bad) = self.rows.iter().position(|r| r.len() != columns) {
            return Err(TsvYieldError::Export(format!(
                "PDF table row {} has {} cells, expected {}",
                bad + 1,
                self.rows[bad].len(),
                columns
            )));
        }

        let widths = self.column_widths();
        let table_width: f64 = widths.iter().sum();
        let header_height = PAD_TOP + LEADING + HEADER_PAD_BOTTOM;
        let row_height = PAD_TOP + LEADING + PAD_BOTTOM;
        let table_height = header_height + row_height * self.rows.len() as f64;

        let mut ops = String::new();
        let mut cursor = LETTER_HEIGHT - PAGE_MARGIN;

        if let Some(title) = &self.title {
            cursor -= TITLE_SIZE;
            let x = (LETTER_WIDTH - text_width(title, Font::Bold, TITLE_SIZE)) / 2.0;
            push_text(&mut ops, title, Font::Bold, TITLE_SIZE, BLACK, x, cursor);
            cursor -= LEADING;
        }
        if let Some(date) = self.generated_on {
            let line = format!("Generated on {}", date.format("%Y-%m-%d"));
            cursor -= SUBTITLE_SIZE;
            let x = (LETTER_WIDTH - text_width(&line, Font::Regular, SUBTITLE_SIZE)) / 2.0;
            push_text(&mut ops, &line, Font::Regular, SUBTITLE_SIZE, BLACK, x, cursor);
            cursor -= LEADING;
        }

        if cursor - table_height < PAGE_MARGIN {
            return Err(TsvYieldError::Export(
                "PDF table does not fit on a single page".into(),
            ));
        }
        if table_width > LETTER_WIDTH - 2.0 * PAGE_MARGIN {
            return Err(TsvYieldError::Export(
                "PDF table is wider than the printable area".into(),
            ));
        }

        let x0 = (LETTER_WIDTH - table_width) / 2.0;
        let top = cursor;

        // Backgrounds
        let _ = writeln!(
            ops,
            "{} {:.2} {:.2} {:.2} {:.2} re f",
            GREY.fill(),
            x0,
            top - header_height,
            table_width,
            header_height
        );
        if !self.rows.is_empty() {
            let body_height = table_height - header_height;
            let _ = writeln!(
                ops,
                "{} {:.2} {:.2} {:.2} {:.2} re f",
                BEIGE.fill(),
                x0,
                top - table_height,
                table_width,
                body_height
            );
        }

        // Cell text, centred in each cell
        let header_baseline = top - header_height + HEADER_PAD_BOTTOM + (LEADING - FONT_SIZE);
        push_row(&mut ops, &self.header, &widths, x0, header_baseline, Font::Bold, WHITESMOKE);
        let mut row_top = top - header_height;
        for row in &self.rows {
            let baseline = row_top - row_height + PAD_BOTTOM + (LEADING - FONT_SIZE);
            push_row(&mut ops, row, &widths, x0, baseline, Font::Regular, BLACK);
            row_top -= row_height;
        }

        // Grid
        let _ = writeln!(ops, "{} {} w", BLACK.stroke(), GRID_WIDTH);
        let bottom = top - table_height;
        let mut y = top;
        for i in 0..=self.rows.len() + 1 {
            let _ = writeln!(ops, "{:.2} {:.2} m {:.2} {:.2} l S", x0, y, x0 + table_width, y);
            y -= if i == 0 { header_height } else { row_height };
        }
        let mut x = x0;
        for i in 0..=widths.len() {
            let _ = writeln!(ops, "{:.2} {:.2} m {:.2} {:.2} l S", x, top, x, bottom);
            if let Some(w) = widths.get(i) {
                x += w;
            }
        }

        Ok(ops)
    }

    fn column_widths(&self) -> Vec<f64> {
        (0..self.header.len())
            .map(|c| {
                let header = text_width(&self.header[c], Font::Bold, FONT_SIZE);
                let body = self
                    .rows
                    .iter()
                    .map(|r| text_width(&r[c], Font::Regular, FONT_SIZE))
                    .fold(0.0_f64, f64::max);
                header.max(body) + 2.0 * PAD_X
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Yield metrics export
// ---------------------------------------------------------------------------

/// Render the metrics as a `Metric | Value` PDF table.
///
/// Body values are shown to 2 decimals.
#[instrument(skip(metrics))]
pub fn to_pdf(metrics: &YieldMetrics, options: &PdfOptions) -> TsvYieldResult<Vec<u8>> {
    let mut builder = PdfTableBuilder::new();
    builder.header(["Metric", "Value"]);
    if let Some(title) = &options.title {
        builder.title(title);
    }
    if let Some(date) = options.generated_on {
        builder.generated_on(date);
    }
    for (metric, value) in metrics.rows() {
        builder.row([metric.key().to_string(), format_2dp(value)]);
    }
    builder.render()
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

fn push_row(
    ops: &mut String,
    cells: &[String],
    widths: &[f64],
    x0: f64,
    baseline: f64,
    font: Font,
    color: Rgb,
) {
    let mut left = x0;
    for (cell, width) in cells.iter().zip(widths) {
        let x = left + (width - text_width(cell, font, FONT_SIZE)) / 2.0;
        push_text(ops, cell, font, FONT_SIZE, color, x, baseline);
        left += width;
    }
}

fn push_text(ops: &mut String, text: &str, font: Font, size: f64, color: Rgb, x: f64, y: f64) {
    let _ = writeln!(
        ops,
        "BT {} {} Tf {} {:.2} {:.2} Td ({}) Tj ET",
        font.resource(),
        size,
        color.fill(),
        x,
        y,
        escape_text(text)
    );
}

/// Escape a string for a PDF literal. Characters outside printable ASCII
/// become `?` since only the base-14 fonts are available.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

/// Advance width in points, from the Adobe base-14 Helvetica metrics.
fn text_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, font))).sum();
    f64::from(units) * size / 1000.0
}

/// Width in 1/1000 em. Outside printable ASCII the viewer draws '?'.
fn glyph_width(c: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA_WIDTHS,
        Font::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = c as usize;
    if (0x20..0x7f).contains(&code) {
        table[code - 0x20]
    } else {
        table[usize::from(b'?') - 0x20]
    }
}

// Helvetica.afm / Helvetica-Bold.afm widths for codes 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
