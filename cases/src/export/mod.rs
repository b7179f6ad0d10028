//! Report exports. Each format projects the case list into its own [`Table`]
//! and renders it independently of the others.

use chrono::DateTime;
use chrono::Local;
use chrono::Utc;
use std::io::Cursor;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

pub mod docx;
pub mod pdf;
pub mod xlsx;

pub const REPORT_PREFIX: &str = "IurisData_Reporte";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no cases to export")]
    NothingToExport,
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to package report: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to render report: {0}")]
    Render(String),
}

/// Row-oriented projection handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `IurisData_Reporte_<YYYY-MM-DD>.<ext>`, dated in UTC like the backups.
pub fn report_file_name(now: &DateTime<Local>, ext: &str) -> String {
    let date = now.with_timezone(&Utc).date_naive();
    format!("{REPORT_PREFIX}_{}.{ext}", date.format("%Y-%m-%d"))
}

pub(crate) fn write_report(
    out_dir: &Path,
    now: &DateTime<Local>,
    ext: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(report_file_name(now, ext));
    std::fs::write(&path, bytes)?;
    tracing::info!("wrote {} report to {}", ext, path.display());
    Ok(path)
}

/// Bundle OOXML parts into a zip package.
pub(crate) fn write_package(parts: &[(&str, String)]) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, body) in parts {
        zip.start_file(*name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Escape text for XML content or attributes, dropping characters XML 1.0 forbids.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
