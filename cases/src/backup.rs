//! Whole-collection backup to a dated JSON file, and validated restore.

use crate::records::RecordStore;
use crate::types::CaseFields;
use crate::types::CaseRecord;
use crate::types::Medium;
use crate::types::REQUIRED_FIELDS;
use crate::types::new_case_id;
use crate::types::now_timestamp;
use chrono::NaiveDate;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("no cases to back up")]
    Empty,
    #[error("failed to write backup: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode backup: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("critical error reading backup: {0}")]
    Unreadable(String),
    #[error("incompatible backup format: expected a list of cases")]
    IncompatibleFormat,
    #[error("case #{index} is not an object")]
    NotAnObject { index: usize },
    #[error("case #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
    #[error("case #{index} has field `{field}` that is not text")]
    NotText { index: usize, field: String },
    #[error("case #{index} has unknown medium `{value}`")]
    InvalidMedium { index: usize, value: String },
    #[error("case #{index} reuses id `{id}`")]
    DuplicateId { index: usize, id: String },
    #[error("failed to save restored cases: {0:#}")]
    Store(anyhow::Error),
}

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("iurisdata_backup_{}.json", date.format("%Y-%m-%d"))
}

pub fn render_backup(cases: &[CaseRecord]) -> Result<String, BackupError> {
    if cases.is_empty() {
        return Err(BackupError::Empty);
    }
    Ok(serde_json::to_string_pretty(cases)?)
}

/// Write `cases` to `<out_dir>/iurisdata_backup_<date>.json` and return that path.
pub fn write_backup(
    cases: &[CaseRecord],
    out_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, BackupError> {
    let body = render_backup(cases)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(backup_file_name(date));
    std::fs::write(&path, body)?;
    tracing::info!("wrote backup of {} cases to {}", cases.len(), path.display());
    Ok(path)
}

/// Parse and validate a backup. Missing ids are minted and a missing
/// `createdAt` is stamped with the current time; anything else that is off
/// rejects the whole file.
pub fn parse_backup(text: &str) -> Result<Vec<CaseRecord>, RestoreError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| RestoreError::Unreadable(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(RestoreError::IncompatibleFormat);
    };
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(obj) = item else {
            return Err(RestoreError::NotAnObject { index });
        };
        let record = validate_record(index, obj)?;
        if !seen.insert(record.id.clone()) {
            return Err(RestoreError::DuplicateId {
                index,
                id: record.id,
            });
        }
        out.push(record);
    }
    Ok(out)
}

/// Required fields must be present as text; blank values are kept, the same
/// way the store keeps them, so every backup restores.
fn validate_record(index: usize, mut obj: Map<String, Value>) -> Result<CaseRecord, RestoreError> {
    if let Some(field) = REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|f| matches!(obj.get(*f), None | Some(Value::Null)))
    {
        return Err(RestoreError::MissingField { index, field });
    }
    let id = optional_text(index, &mut obj, "id")?
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_case_id);
    let created_at = optional_text(index, &mut obj, "createdAt")?
        .filter(|ts| !ts.trim().is_empty())
        .unwrap_or_else(now_timestamp);
    let medium = match optional_text(index, &mut obj, "medium")? {
        None => Medium::default(),
        Some(value) => value
            .parse::<Medium>()
            .map_err(|_| RestoreError::InvalidMedium { index, value })?,
    };

    let mut text =
        |field: &str| optional_text(index, &mut obj, field).map(Option::unwrap_or_default);
    let fields = CaseFields {
        date_time: text("dateTime")?,
        nurej: text("nurej")?,
        case_number: text("caseNumber")?,
        city: text("city")?,
        characteristics: text("characteristics")?,
        parties: text("parties")?,
        crime: text("crime")?,
        hearing_type: text("hearingType")?,
        court_room: text("courtRoom")?,
        lawyer: text("lawyer")?,
        medium,
        observations: text("observations")?,
    };
    Ok(CaseRecord {
        id,
        fields,
        created_at,
    })
}

fn optional_text(
    index: usize,
    obj: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<String>, RestoreError> {
    match obj.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(RestoreError::NotText {
            index,
            field: field.to_string(),
        }),
    }
}

/// Replace the whole collection with the backup at `path`. On any error the
/// store is left untouched. Returns the number of restored cases.
pub fn restore_from_path(store: &mut RecordStore, path: &Path) -> Result<usize, RestoreError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| RestoreError::Unreadable(format!("{}: {e}", path.display())))?;
    restore_from_str(store, &text)
}

pub fn restore_from_str(store: &mut RecordStore, text: &str) -> Result<usize, RestoreError> {
    let cases = parse_backup(text)?;
    let n = cases.len();
    store.replace_all(cases).map_err(RestoreError::Store)?;
    tracing::info!("restored {n} cases from backup");
    Ok(n)
}
