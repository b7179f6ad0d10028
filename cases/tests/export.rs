use chrono::Local;
use chrono::TimeZone;
use iurisdata_cases::export::ExportError;
use iurisdata_cases::export::docx;
use iurisdata_cases::export::pdf;
use iurisdata_cases::export::xlsx;
use iurisdata_cases::types::CaseFields;
use iurisdata_cases::types::CaseRecord;
use iurisdata_cases::types::Medium;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::io::Read as _;

fn cases() -> Vec<CaseRecord> {
    vec![
        CaseRecord {
            id: "1".into(),
            fields: CaseFields {
                date_time: "2024-03-05T14:00".into(),
                nurej: "2222".into(),
                case_number: "FIS-LPZ-1/2024".into(),
                city: "La Paz".into(),
                characteristics: "Sustracción de vehículo".into(),
                parties: "Pérez & Cía <S.A.>".into(),
                crime: "Robo".into(),
                hearing_type: "Cautelares".into(),
                court_room: "Juzgado 1ro".into(),
                lawyer: "Dr. Demo".into(),
                medium: Medium::Virtual,
                observations: "Primera línea\nResumen IA: detenido".into(),
            },
            created_at: "2024-03-01T10:00:00.000Z".into(),
        },
        // Only the bare minimum filled in.
        CaseRecord {
            id: "2".into(),
            fields: CaseFields::default(),
            created_at: String::new(),
        },
    ]
}

fn now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn zip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn tabular_projection_has_thirteen_labelled_columns() {
    let table = xlsx::project(&cases());
    assert_eq!(table.columns.len(), 13);
    assert_eq!(table.columns[0], "Fecha y Hora");
    assert_eq!(table.columns[12], "Fecha de Registro");
    assert_eq!(table.rows[0][0], "2024-03-05 14:00");
    assert_eq!(table.rows[0][9], "Virtual");
    assert!(table.rows.iter().all(|r| r.len() == 13));
    assert_eq!(table.rows[1][1], "");
}

#[test]
fn xlsx_package_contains_escaped_inline_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx::export_xlsx(&cases(), dir.path(), &now()).unwrap();
    let name = path.file_name().and_then(|n| n.to_str()).unwrap();
    assert!(name.starts_with("IurisData_Reporte_2024-06-1"));
    assert!(name.ends_with(".xlsx"));

    let bytes = std::fs::read(&path).unwrap();
    let workbook = zip_entry(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="Casos Legales""#));
    let sheet = zip_entry(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="M1" t="inlineStr"><is><t xml:space="preserve">Fecha de Registro</t>"#));
    assert!(sheet.contains("Pérez &amp; Cía &lt;S.A.&gt;"));
    assert_eq!(sheet.matches("<row ").count(), 3);
    zip_entry(&bytes, "[Content_Types].xml");
}

#[test]
fn page_report_has_nine_columns_and_title() {
    let table = pdf::project(&cases());
    assert_eq!(table.columns.len(), 9);
    assert_eq!(table.rows[0][8], "Virtual");
    assert_eq!(table.rows[0][3], "La Paz");

    let dir = tempfile::tempdir().unwrap();
    let path = pdf::export_pdf(&cases(), dir.path(), &now()).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
    let bytes = std::fs::read(&path).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.trim_end().ends_with("%%EOF"));
    assert!(text.contains("(REPORTE DE CASOS LEGALES - IURISDATA)"));
    assert!(text.contains("(Generado el: 15/06/2024)"));
    // landscape A4
    assert!(text.contains("/MediaBox [0 0 841.89 595.28]"));
}

#[tokio::test]
async fn document_report_skips_city_and_includes_observations() {
    let table = docx::project(&cases());
    assert_eq!(table.columns.len(), 9);
    assert!(!table.columns.contains(&"CIUDAD"));
    assert_eq!(table.columns[8], "OBSERVACIONES");
    assert_eq!(table.rows[0][6], "Juzgado 1ro");

    let dir = tempfile::tempdir().unwrap();
    let path = docx::export_docx(&cases(), dir.path(), &now()).await.unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("docx"));
    let bytes = std::fs::read(&path).unwrap();
    let doc = zip_entry(&bytes, "word/document.xml");
    assert!(doc.contains("REPORTE LEGAL CONSOLIDADO - IURISDATA"));
    assert!(doc.contains("Fecha de Reporte: 15/06/2024 12:00:00"));
    assert!(doc.contains("Primera línea</w:t><w:br/>"));
    assert!(!doc.contains("La Paz"));
}

#[tokio::test]
async fn empty_collection_produces_no_file_in_any_format() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        xlsx::export_xlsx(&[], dir.path(), &now()),
        Err(ExportError::NothingToExport)
    ));
    assert!(matches!(
        pdf::export_pdf(&[], dir.path(), &now()),
        Err(ExportError::NothingToExport)
    ));
    assert!(matches!(
        docx::export_docx(&[], dir.path(), &now()).await,
        Err(ExportError::NothingToExport)
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
