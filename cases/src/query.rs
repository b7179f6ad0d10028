use crate::types::CaseRecord;
use chrono::DateTime;
use chrono::NaiveDateTime;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Display view of `cases`: those matching `term`, most recent hearing first.
///
/// A case matches when `term` occurs, ignoring case, in its NUREJ, case
/// number, crime, lawyer or parties. The empty term matches everything.
/// Cases whose hearing time cannot be parsed go last. The whole view is
/// recomputed on every call; at a few thousand cases that is cheap enough
/// not to warrant an index.
pub fn filter_cases(cases: &[CaseRecord], term: &str) -> Vec<CaseRecord> {
    let needle = term.to_lowercase();
    let mut out: Vec<(Option<NaiveDateTime>, CaseRecord)> = cases
        .iter()
        .filter(|c| needle.is_empty() || matches(c, &needle))
        .map(|c| (parse_hearing_time(&c.fields.date_time), c.clone()))
        .collect();
    // Stable, and `None` orders below every `Some`.
    out.sort_by(|a, b| b.0.cmp(&a.0));
    out.into_iter().map(|(_, c)| c).collect()
}

fn matches(case: &CaseRecord, needle: &str) -> bool {
    let f = &case.fields;
    [&f.nurej, &f.case_number, &f.crime, &f.lawyer, &f.parties]
        .into_iter()
        .any(|v| v.to_lowercase().contains(needle))
}

/// Plain forms are taken as written; RFC 3339 values with an offset are
/// normalised to UTC so they order by instant.
pub fn parse_hearing_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Hearing time as shown to people: the `T` separator becomes a space.
pub fn display_datetime(raw: &str) -> String {
    raw.replacen('T', " ", 1)
}
