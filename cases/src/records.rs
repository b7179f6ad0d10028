//! The canonical in-memory case collection and its write-through persistence.

use crate::store::CaseSlot;
use crate::types::CaseFields;
use crate::types::CaseRecord;
use crate::types::Medium;
use crate::types::new_case_id;
use crate::types::now_timestamp;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashSet;

/// Counters shown above the case table.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CaseStats {
    pub total: usize,
    pub presencial: usize,
    #[serde(rename = "virtual")]
    pub virtual_count: usize,
}

/// Owns the case collection. Every mutation is written to the slot before it
/// returns; a failed write leaves the collection as it was.
pub struct RecordStore {
    slot: Box<dyn CaseSlot>,
    cases: Vec<CaseRecord>,
}

impl RecordStore {
    /// Hydrate from `slot`. Unreadable or malformed data yields an empty store.
    /// Ids and timestamps minted while loading are written back at once so
    /// they stay the same on the next open.
    pub fn open(slot: impl CaseSlot + 'static) -> Self {
        let (cases, repaired) = hydrate(&slot);
        let store = Self {
            slot: Box::new(slot),
            cases,
        };
        if repaired && let Err(e) = store.persist() {
            tracing::warn!("could not save repaired cases: {e:#}");
        }
        store
    }

    /// Cases in store order (newest insertion first).
    pub fn list(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn get(&self, id: &str) -> Option<&CaseRecord> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn create(&mut self, fields: CaseFields) -> anyhow::Result<CaseRecord> {
        let mut record = CaseRecord::new(fields);
        while self.get(&record.id).is_some() {
            record.id = new_case_id();
        }
        let stored = record.clone();
        self.mutate(move |cases| cases.insert(0, stored))?;
        tracing::debug!(id = %record.id, "case created");
        Ok(record)
    }

    /// Replace every editable field of `id`. Returns `false` (and writes
    /// nothing) when no such case exists.
    pub fn update(&mut self, id: &str, fields: CaseFields) -> anyhow::Result<bool> {
        let Some(pos) = self.cases.iter().position(|c| c.id == id) else {
            tracing::debug!(%id, "update ignored: unknown id");
            return Ok(false);
        };
        self.mutate(move |cases| cases[pos].fields = fields)?;
        Ok(true)
    }

    /// Remove `id` if present. Returns whether a case was removed.
    pub fn delete(&mut self, id: &str) -> anyhow::Result<bool> {
        let before = self.cases.len();
        self.mutate(|cases| cases.retain(|c| c.id != id))?;
        Ok(self.cases.len() != before)
    }

    /// Swap in a whole new collection, back-filling blank ids.
    pub fn replace_all(&mut self, mut cases: Vec<CaseRecord>) -> anyhow::Result<()> {
        for case in cases.iter_mut().filter(|c| c.id.trim().is_empty()) {
            case.id = new_case_id();
        }
        self.mutate(move |current| *current = cases)
    }

    pub fn stats(&self) -> CaseStats {
        let virtual_count = self
            .cases
            .iter()
            .filter(|c| c.fields.medium == Medium::Virtual)
            .count();
        CaseStats {
            total: self.cases.len(),
            presencial: self.cases.len() - virtual_count,
            virtual_count,
        }
    }

    fn mutate(&mut self, f: impl FnOnce(&mut Vec<CaseRecord>)) -> anyhow::Result<()> {
        let previous = self.cases.clone();
        f(&mut self.cases);
        if let Err(e) = self.persist() {
            self.cases = previous;
            return Err(e);
        }
        Ok(())
    }

    fn persist(&self) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&self.cases)?;
        self.slot.write(&payload)
    }
}

/// Returns the loaded cases and whether any id or `createdAt` was minted.
fn hydrate(slot: &dyn CaseSlot) -> (Vec<CaseRecord>, bool) {
    let payload = match slot.read() {
        Ok(Some(p)) => p,
        Ok(None) => return (Vec::new(), false),
        Err(e) => {
            tracing::warn!("could not read stored cases, starting empty: {e:#}");
            return (Vec::new(), false);
        }
    };
    let items = match serde_json::from_str::<Value>(&payload) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("stored cases are not an array, starting empty");
            return (Vec::new(), false);
        }
        Err(e) => {
            tracing::warn!("stored cases are not valid JSON, starting empty: {e}");
            return (Vec::new(), false);
        }
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    let mut repaired = false;
    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(obj) = item else {
            tracing::warn!(index, "skipping stored case that is not an object");
            continue;
        };
        let Some((mut record, stamped)) = lenient_record(index, obj) else {
            continue;
        };
        repaired |= stamped;
        if record.id.trim().is_empty() {
            record.id = new_case_id();
            repaired = true;
            tracing::info!(index, id = %record.id, "assigned id to stored case");
        } else if seen.contains(&record.id) {
            let fresh = new_case_id();
            tracing::warn!(index, old = %record.id, new = %fresh, "duplicate stored id reassigned");
            record.id = fresh;
            repaired = true;
        }
        seen.insert(record.id.clone());
        out.push(record);
    }
    (out, repaired)
}

/// The flag is set when `createdAt` had to be stamped.
fn lenient_record(index: usize, mut obj: Map<String, Value>) -> Option<(CaseRecord, bool)> {
    let id = take_text(&mut obj, "id").unwrap_or_default();
    let stored_at = take_text(&mut obj, "createdAt").filter(|ts| !ts.trim().is_empty());
    let stamped = stored_at.is_none();
    let created_at = stored_at.unwrap_or_else(now_timestamp);
    if let Some(medium) = obj.get("medium")
        && medium.as_str().and_then(|m| m.parse::<Medium>().ok()).is_none()
    {
        tracing::warn!(index, "unknown medium {medium} on stored case, using Presencial");
        obj.remove("medium");
    }
    // Nulls and numbers are coerced to text rather than dropping the record.
    for value in obj.values_mut() {
        match value {
            Value::Null => *value = Value::String(String::new()),
            Value::Number(n) => *value = Value::String(n.to_string()),
            Value::Bool(b) => *value = Value::String(b.to_string()),
            _ => {}
        }
    }
    match serde_json::from_value::<CaseFields>(Value::Object(obj)) {
        Ok(fields) => Some((
            CaseRecord {
                id,
                fields,
                created_at,
            },
            stamped,
        )),
        Err(e) => {
            tracing::warn!(index, "skipping unreadable stored case: {e}");
            None
        }
    }
}

fn take_text(obj: &mut Map<String, Value>, key: &str) -> Option<String> {
    match obj.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
