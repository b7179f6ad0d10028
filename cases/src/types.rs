use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How a hearing is attended.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Medium {
    #[default]
    Presencial,
    Virtual,
}

impl Medium {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Presencial => "Presencial",
            Medium::Virtual => "Virtual",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hearing medium: {0} (expected Presencial or Virtual)")]
pub struct ParseMediumError(pub String);

impl FromStr for Medium {
    type Err = ParseMediumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("presencial") {
            Ok(Medium::Presencial)
        } else if s.eq_ignore_ascii_case("virtual") {
            Ok(Medium::Virtual)
        } else {
            Err(ParseMediumError(s.to_string()))
        }
    }
}

/// Fields a user edits through the case form. Excludes identity and creation time.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaseFields {
    /// Local date and time of the hearing, `YYYY-MM-DDTHH:MM`.
    #[serde(default)]
    pub date_time: String,
    #[serde(default)]
    pub nurej: String,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub characteristics: String,
    #[serde(default)]
    pub parties: String,
    #[serde(default)]
    pub crime: String,
    #[serde(default)]
    pub hearing_type: String,
    #[serde(default)]
    pub court_room: String,
    #[serde(default)]
    pub lawyer: String,
    #[serde(default)]
    pub medium: Medium,
    #[serde(default)]
    pub observations: String,
}

/// Wire names of the fields the form refuses to submit blank.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "dateTime",
    "nurej",
    "caseNumber",
    "city",
    "crime",
    "hearingType",
    "courtRoom",
    "lawyer",
    "parties",
];

impl CaseFields {
    /// Look up a text field by its wire name. `medium` is not a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        let v = match name {
            "dateTime" => &self.date_time,
            "nurej" => &self.nurej,
            "caseNumber" => &self.case_number,
            "city" => &self.city,
            "characteristics" => &self.characteristics,
            "parties" => &self.parties,
            "crime" => &self.crime,
            "hearingType" => &self.hearing_type,
            "courtRoom" => &self.court_room,
            "lawyer" => &self.lawyer,
            "observations" => &self.observations,
            _ => return None,
        };
        Some(v.as_str())
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|name| self.text(name).is_none_or(|v| v.trim().is_empty()))
            .collect()
    }
}

/// A single legal case as stored and exported.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: CaseFields,
    /// RFC3339, fixed at creation.
    pub created_at: String,
}

impl CaseRecord {
    pub fn new(fields: CaseFields) -> Self {
        Self {
            id: new_case_id(),
            fields,
            created_at: now_timestamp(),
        }
    }
}

pub fn new_case_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
