//! Consolidated Word report. Assembly runs off the async executor.

use super::ExportError;
use super::Table;
use super::write_package;
use super::write_report;
use super::xml_escape;
use crate::query::display_datetime;
use crate::types::CaseRecord;
use chrono::DateTime;
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;

pub const TITLE: &str = "REPORTE LEGAL CONSOLIDADO - IURISDATA";

pub const COLUMNS: [&str; 9] = [
    "FECHA/HORA",
    "NUREJ",
    "NRO. CASO",
    "DELITO",
    "PARTES",
    "ABOGADO",
    "JUZGADO/SALA",
    "MODALIDAD",
    "OBSERVACIONES",
];

const HEADER_FILL: &str = "1E293B";
/// Half-points.
const HEADER_SIZE: u32 = 32;
const BODY_SIZE: u32 = 28;
/// A4 landscape in twips, with 2 cm margins.
const PAGE_W: u32 = 16838;
const PAGE_H: u32 = 11906;
const PAGE_MARGIN: u32 = 1134;

pub fn project(cases: &[CaseRecord]) -> Table {
    let rows = cases
        .iter()
        .map(|c| {
            let f = &c.fields;
            vec![
                display_datetime(&f.date_time),
                f.nurej.clone(),
                f.case_number.clone(),
                f.crime.clone(),
                f.parties.clone(),
                f.lawyer.clone(),
                f.court_room.clone(),
                f.medium.to_string(),
                f.observations.clone(),
            ]
        })
        .collect();
    Table {
        title: TITLE.to_string(),
        columns: COLUMNS.to_vec(),
        rows,
    }
}

/// A run of text; embedded newlines become line breaks.
fn run(text: &str, props: &str) -> String {
    let mut xml = format!("<w:r><w:rPr>{props}</w:rPr>");
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, xml_escape(line));
    }
    xml.push_str("</w:r>");
    xml
}

fn paragraph(align: Option<&str>, runs: &str) -> String {
    match align {
        Some(a) => format!(r#"<w:p><w:pPr><w:jc w:val="{a}"/></w:pPr>{runs}</w:p>"#),
        None => format!("<w:p>{runs}</w:p>"),
    }
}

fn document_xml(table: &Table, generated_at: &str) -> String {
    let cols = table.columns.len().max(1) as u32;
    let grid_w = (PAGE_W - 2 * PAGE_MARGIN) / cols;
    let mut body = String::new();

    body.push_str(&paragraph(
        Some("center"),
        &run(&table.title, r#"<w:b/><w:sz w:val="32"/>"#),
    ));
    body.push_str(&paragraph(
        Some("right"),
        &run(&format!("Fecha de Reporte: {generated_at}"), ""),
    ));
    body.push_str("<w:p/>");

    body.push_str(
        r#"<w:tbl><w:tblPr><w:tblW w:w="5000" w:type="pct"/><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr><w:tblGrid>"#,
    );
    for _ in 0..cols {
        let _ = write!(body, r#"<w:gridCol w:w="{grid_w}"/>"#);
    }
    body.push_str("</w:tblGrid>");

    body.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
    let header_props = format!(r#"<w:b/><w:color w:val="FFFFFF"/><w:sz w:val="{HEADER_SIZE}"/>"#);
    for col in &table.columns {
        let _ = write!(
            body,
            r#"<w:tc><w:tcPr><w:shd w:val="clear" w:color="auto" w:fill="{HEADER_FILL}"/></w:tcPr>{}</w:tc>"#,
            paragraph(Some("center"), &run(col, &header_props))
        );
    }
    body.push_str("</w:tr>");

    let body_props = format!(r#"<w:sz w:val="{BODY_SIZE}"/>"#);
    for row in &table.rows {
        body.push_str("<w:tr>");
        for i in 0..table.columns.len() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            let _ = write!(body, "<w:tc>{}</w:tc>", paragraph(None, &run(text, &body_props)));
        }
        body.push_str("</w:tr>");
    }
    body.push_str("</w:tbl>");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="{PAGE_W}" w:h="{PAGE_H}" w:orient="landscape"/><w:pgMar w:top="{PAGE_MARGIN}" w:right="{PAGE_MARGIN}" w:bottom="{PAGE_MARGIN}" w:left="{PAGE_MARGIN}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

pub fn render(table: &Table, generated_at: &str) -> Result<Vec<u8>, ExportError> {
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;
    write_package(&[
        ("[Content_Types].xml", content_types.to_string()),
        ("_rels/.rels", rels.to_string()),
        ("word/document.xml", document_xml(table, generated_at)),
    ])
}

/// Assemble the document on the blocking pool, write it into `out_dir` and
/// return its path.
pub async fn export_docx(
    cases: &[CaseRecord],
    out_dir: &Path,
    now: &DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    if cases.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let table = project(cases);
    let stamp = now.format("%d/%m/%Y %H:%M:%S").to_string();
    let bytes = tokio::task::spawn_blocking(move || render(&table, &stamp))
        .await
        .map_err(|e| ExportError::Render(format!("document assembly task failed: {e}")))??;
    write_report(out_dir, now, "docx", &bytes)
}
