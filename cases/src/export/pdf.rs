//! Landscape A4 page report, written as a minimal uncompressed PDF 1.4.

use super::ExportError;
use super::Table;
use super::write_report;
use crate::query::display_datetime;
use crate::types::CaseRecord;
use chrono::DateTime;
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;

pub const TITLE: &str = "REPORTE DE CASOS LEGALES - IURISDATA";

pub const COLUMNS: [&str; 9] = [
    "Fecha/Hora",
    "NUREJ",
    "Nro Caso",
    "Ciudad",
    "Delito",
    "Partes",
    "Audiencia",
    "Abogado",
    "Modalidad",
];

/// Relative column widths, same order as [`COLUMNS`].
const COLUMN_WEIGHTS: [f32; 9] = [1.2, 1.0, 1.1, 0.9, 1.2, 1.6, 1.1, 1.1, 0.8];

// Geometry in millimetres unless noted.
const PT_PER_MM: f32 = 72.0 / 25.4;
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN_X: f32 = 14.0;
const TITLE_Y: f32 = 15.0;
const SUBTITLE_Y: f32 = 22.0;
const TABLE_START_Y: f32 = 28.0;
const CONTINUED_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 10.0;
const CELL_PADDING: f32 = 2.0;
const FONT_PT: f32 = 7.0;
const LINE_FACTOR: f32 = 1.15;
/// Average Helvetica glyph advance as a fraction of the font size.
const GLYPH_EM: f32 = 0.55;

const HEADER_FILL: (u8, u8, u8) = (30, 41, 59);
const ALT_ROW_FILL: (u8, u8, u8) = (248, 250, 252);
const GRID_GRAY: f32 = 0.78;

pub fn project(cases: &[CaseRecord]) -> Table {
    let rows = cases
        .iter()
        .map(|c| {
            let f = &c.fields;
            vec![
                display_datetime(&f.date_time),
                f.nurej.clone(),
                f.case_number.clone(),
                f.city.clone(),
                f.crime.clone(),
                f.parties.clone(),
                f.hearing_type.clone(),
                f.lawyer.clone(),
                f.medium.to_string(),
            ]
        })
        .collect();
    Table {
        title: TITLE.to_string(),
        columns: COLUMNS.to_vec(),
        rows,
    }
}

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// PDF y axis grows upwards from the bottom edge.
fn pdf_y(mm_from_top: f32) -> f32 {
    pt(PAGE_H - mm_from_top)
}

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0
    )
}

/// Encode `s` as a PDF literal string in WinAnsi. Non-ASCII bytes are
/// written as octal escapes so content streams stay 7-bit.
fn pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('(');
    for ch in s.chars() {
        let code = ch as u32;
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ if (0x20..0x7f).contains(&code) => out.push(ch),
            _ if (0xa0..=0xff).contains(&code) => {
                let _ = write!(out, "\\{code:03o}");
            }
            '\t' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Greedy word wrap against an estimated glyph width. Words that do not fit
/// on a line by themselves are split.
fn wrap(text: &str, width_mm: f32) -> Vec<String> {
    let glyph_mm = FONT_PT * GLYPH_EM / PT_PER_MM;
    let max_chars = ((width_mm / glyph_mm).floor() as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line.is_empty() {
                word.len()
            } else {
                line.chars().count() + 1 + word.len()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct Layout {
    widths: Vec<f32>,
    line_mm: f32,
}

impl Layout {
    fn new(columns: usize) -> Self {
        let weights: Vec<f32> = (0..columns)
            .map(|i| COLUMN_WEIGHTS.get(i).copied().unwrap_or(1.0))
            .collect();
        let total: f32 = weights.iter().sum();
        let usable = PAGE_W - 2.0 * MARGIN_X;
        Self {
            widths: weights.iter().map(|w| usable * w / total).collect(),
            line_mm: FONT_PT * LINE_FACTOR / PT_PER_MM,
        }
    }

    fn wrap_row(&self, row: &[String]) -> (Vec<Vec<String>>, f32) {
        let cells: Vec<Vec<String>> = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = row.get(i).map(String::as_str).unwrap_or("");
                wrap(text, w - 2.0 * CELL_PADDING)
            })
            .collect();
        let height = self.height(&cells);
        (cells, height)
    }

    fn height(&self, cells: &[Vec<String>]) -> f32 {
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        lines as f32 * self.line_mm + 2.0 * CELL_PADDING
    }
}

#[derive(Default)]
struct Page {
    ops: String,
}

impl Page {
    fn text(&mut self, font: &str, size: f32, x_mm: f32, y_mm: f32, s: &str) {
        let _ = writeln!(
            self.ops,
            "BT /{font} {size:.1} Tf 1 0 0 1 {:.2} {:.2} Tm {} Tj ET",
            pt(x_mm),
            pdf_y(y_mm),
            pdf_string(s)
        );
    }

    fn row(
        &mut self,
        layout: &Layout,
        top: f32,
        height: f32,
        cells: &[Vec<String>],
        fill: Option<(u8, u8, u8)>,
        header: bool,
    ) {
        let mut x = MARGIN_X;
        for (i, width) in layout.widths.iter().enumerate() {
            let rect = format!(
                "{:.2} {:.2} {:.2} {:.2} re",
                pt(x),
                pdf_y(top + height),
                pt(*width),
                pt(height)
            );
            if let Some(color) = fill {
                let _ = writeln!(self.ops, "{} rg {rect} f", rgb(color));
            }
            let _ = writeln!(self.ops, "{GRID_GRAY} G 0.28 w {rect} S");
            let color = if header { "1 1 1 rg" } else { "0.2 0.2 0.2 rg" };
            let _ = writeln!(self.ops, "{color}");
            let font = if header { "F2" } else { "F1" };
            let size_mm = FONT_PT / PT_PER_MM;
            let mut baseline = top + CELL_PADDING + size_mm * 0.8;
            for line in cells.get(i).into_iter().flatten() {
                if !line.is_empty() {
                    self.text(font, FONT_PT, x + CELL_PADDING, baseline, line);
                }
                baseline += layout.line_mm;
            }
            x += width;
        }
    }
}

/// Start a follow-up page with the header row repeated; returns the next free y.
fn continued_page(
    page: &mut Page,
    layout: &Layout,
    header_cells: &[Vec<String>],
    header_h: f32,
) -> f32 {
    page.row(layout, CONTINUED_TOP, header_h, header_cells, Some(HEADER_FILL), true);
    CONTINUED_TOP + header_h
}

/// Lay out `table` with a title block dated `generated_on` and return the PDF bytes.
pub fn render(table: &Table, generated_on: &str) -> Vec<u8> {
    let layout = Layout::new(table.columns.len());
    let header: Vec<String> = table.columns.iter().map(|c| c.to_string()).collect();
    let (header_cells, header_h) = layout.wrap_row(&header);

    let mut pages = Vec::new();
    let mut page = Page::default();
    page.ops.push_str("0 0 0 rg\n");
    page.text("F1", 18.0, MARGIN_X, TITLE_Y, &table.title);
    page.text("F1", 10.0, MARGIN_X, SUBTITLE_Y, &format!("Generado el: {generated_on}"));
    let mut y = TABLE_START_Y;
    page.row(&layout, y, header_h, &header_cells, Some(HEADER_FILL), true);
    y += header_h;
    let mut rows_on_page = 0usize;

    let bottom = PAGE_H - MARGIN_BOTTOM;
    for (i, row) in table.rows.iter().enumerate() {
        let fill = (i % 2 == 1).then_some(ALT_ROW_FILL);
        let (mut cells, _) = layout.wrap_row(row);
        loop {
            let height = layout.height(&cells);
            if y + height <= bottom {
                page.row(&layout, y, height, &cells, fill, false);
                y += height;
                rows_on_page += 1;
                break;
            }
            let fits_fresh_page = height <= bottom - CONTINUED_TOP - header_h;
            let mut fit =
                ((bottom - y - 2.0 * CELL_PADDING) / layout.line_mm).floor().max(0.0) as usize;
            if rows_on_page > 0 && (fit == 0 || fits_fresh_page) {
                pages.push(std::mem::take(&mut page));
                y = continued_page(&mut page, &layout, &header_cells, header_h);
                rows_on_page = 0;
                continue;
            }
            // Taller than a whole page: draw what fits and carry the rest over.
            fit = fit.max(1);
            let rest: Vec<Vec<String>> = cells
                .iter_mut()
                .map(|c| c.split_off(fit.min(c.len())))
                .collect();
            let height = layout.height(&cells);
            page.row(&layout, y, height, &cells, fill, false);
            pages.push(std::mem::take(&mut page));
            y = continued_page(&mut page, &layout, &header_cells, header_h);
            rows_on_page = 0;
            cells = rest;
        }
    }
    pages.push(page);

    assemble(&pages)
}

fn assemble(pages: &[Page]) -> Vec<u8> {
    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    let mut object = |out: &mut String, body: String| {
        offsets.push(out.len());
        let n = offsets.len();
        let _ = write!(out, "{n} 0 obj\n{body}\nendobj\n");
    };

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect();
    object(&mut out, "<< /Type /Catalog /Pages 2 0 R >>".to_string());
    object(
        &mut out,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );
    object(
        &mut out,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    object(
        &mut out,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    for (i, page) in pages.iter().enumerate() {
        let contents = 6 + 2 * i;
        object(
            &mut out,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {contents} 0 R >>",
                pt(PAGE_W),
                pt(PAGE_H)
            ),
        );
        object(
            &mut out,
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                page.ops.len(),
                page.ops
            ),
        );
    }

    let xref_at = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
    for offset in &offsets {
        let _ = writeln!(out, "{offset:010} 00000 n ");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        offsets.len() + 1
    );
    out.into_bytes()
}

/// Write the page report into `out_dir` and return its path.
pub fn export_pdf(
    cases: &[CaseRecord],
    out_dir: &Path,
    now: &DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    if cases.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let bytes = render(&project(cases), &now.format("%d/%m/%Y").to_string());
    write_report(out_dir, now, "pdf", &bytes)
}
