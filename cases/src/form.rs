//! Draft editing for a single case, including the optional AI summary action.

use crate::records::RecordStore;
use crate::types::CaseFields;
use crate::types::CaseRecord;
use async_trait::async_trait;

pub const SUMMARY_PREFIX: &str = "Resumen IA: ";
pub const SUMMARY_EMPTY: &str = "No se pudo generar el análisis.";
pub const SUMMARY_FAILED: &str = "Error al conectar con la IA para el análisis.";

/// External text-generation collaborator producing a short case summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, characteristics: &str, crime: &str) -> anyhow::Result<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("summary unavailable: characteristics are empty or a request is already running")]
    SummaryUnavailable,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(CaseRecord),
    /// `found` is false when the case vanished while the form was open.
    Updated { id: String, found: bool },
}

/// Inputs captured when a summary request starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub characteristics: String,
    pub crime: String,
}

#[derive(Debug, Clone)]
pub struct CaseForm {
    mode: FormMode,
    pub draft: CaseFields,
    analyzing: bool,
}

impl Default for CaseForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseForm {
    pub fn new() -> Self {
        Self {
            mode: FormMode::New,
            draft: CaseFields::default(),
            analyzing: false,
        }
    }

    pub fn edit(case: &CaseRecord) -> Self {
        Self {
            mode: FormMode::Edit {
                id: case.id.clone(),
            },
            draft: case.fields.clone(),
            analyzing: false,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Whether the AI action is currently offered.
    pub fn can_summarize(&self) -> bool {
        !self.analyzing && !self.draft.characteristics.trim().is_empty()
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        self.draft.missing_required()
    }

    pub fn submit(self, store: &mut RecordStore) -> Result<Submitted, FormError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        match self.mode {
            FormMode::New => Ok(Submitted::Created(store.create(self.draft)?)),
            FormMode::Edit { id } => {
                let found = store.update(&id, self.draft)?;
                Ok(Submitted::Updated { id, found })
            }
        }
    }

    pub fn begin_summary(&mut self) -> Result<SummaryRequest, FormError> {
        if !self.can_summarize() {
            return Err(FormError::SummaryUnavailable);
        }
        self.analyzing = true;
        Ok(SummaryRequest {
            characteristics: self.draft.characteristics.clone(),
            crime: self.draft.crime.clone(),
        })
    }

    /// Settle an outstanding request. Never fails: errors become a fixed note.
    pub fn finish_summary(&mut self, result: anyhow::Result<String>) {
        self.analyzing = false;
        let text = match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => SUMMARY_EMPTY.to_string(),
            Err(e) => {
                tracing::error!("case summary request failed: {e:#}");
                SUMMARY_FAILED.to_string()
            }
        };
        let block = format!("{SUMMARY_PREFIX}{text}");
        let obs = &mut self.draft.observations;
        if obs.is_empty() {
            *obs = block;
        } else {
            obs.push_str("\n\n");
            obs.push_str(&block);
        }
    }

    pub async fn request_summary(&mut self, summarizer: &dyn Summarizer) -> Result<(), FormError> {
        let req = self.begin_summary()?;
        let result = summarizer.summarize(&req.characteristics, &req.crime).await;
        self.finish_summary(result);
        Ok(())
    }
}
