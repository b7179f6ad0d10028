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

pub const SHEET_NAME: &str = "Casos Legales";

pub const COLUMNS: [&str; 13] = [
    "Fecha y Hora",
    "NUREJ",
    "Nro. de Caso",
    "Ciudad",
    "Delito",
    "Partes Involucradas",
    "Tipo de Audiencia",
    "Juzgado / Sala",
    "Abogado Patrocinante",
    "Modalidad",
    "Características",
    "Observaciones / Resumen IA",
    "Fecha de Registro",
];

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
                f.court_room.clone(),
                f.lawyer.clone(),
                f.medium.to_string(),
                f.characteristics.clone(),
                f.observations.clone(),
                local_timestamp(&c.created_at),
            ]
        })
        .collect();
    Table {
        title: SHEET_NAME.to_string(),
        columns: COLUMNS.to_vec(),
        rows,
    }
}

fn local_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

/// Zero-based column index to a spreadsheet column name (`0` → `A`, `26` → `AA`).
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn sheet_xml(table: &Table) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let header = table.columns.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    for (r, row) in std::iter::once(&header).chain(table.rows.iter()).enumerate() {
        let row_num = r + 1;
        let _ = write!(xml, r#"<row r="{row_num}">"#);
        for (c, value) in row.iter().enumerate() {
            let cell = column_name(c);
            let _ = write!(
                xml,
                r#"<c r="{cell}{row_num}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                xml_escape(value)
            );
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

pub fn render(table: &Table) -> Result<Vec<u8>, ExportError> {
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        xml_escape(&table.title)
    );
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    write_package(&[
        ("[Content_Types].xml", content_types.to_string()),
        ("_rels/.rels", root_rels.to_string()),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(table)),
    ])
}

/// Write the spreadsheet report into `out_dir` and return its path.
pub fn export_xlsx(
    cases: &[CaseRecord],
    out_dir: &Path,
    now: &DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    if cases.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let bytes = render(&project(cases))?;
    write_report(out_dir, now, "xlsx", &bytes)
}
