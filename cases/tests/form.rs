use async_trait::async_trait;
use iurisdata_cases::RecordStore;
use iurisdata_cases::form::CaseForm;
use iurisdata_cases::form::FormError;
use iurisdata_cases::form::FormMode;
use iurisdata_cases::form::SUMMARY_EMPTY;
use iurisdata_cases::form::SUMMARY_FAILED;
use iurisdata_cases::form::Submitted;
use iurisdata_cases::form::Summarizer;
use iurisdata_cases::store::memory::MemorySlot;
use iurisdata_cases::types::CaseFields;
use pretty_assertions::assert_eq;
use std::sync::Mutex;

struct Canned {
    reply: Result<String, String>,
    seen: Mutex<Vec<(String, String)>>,
}

impl Canned {
    fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err("quota exceeded".to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Summarizer for Canned {
    async fn summarize(&self, characteristics: &str, crime: &str) -> anyhow::Result<String> {
        self.seen
            .lock()
            .unwrap()
            .push((characteristics.to_string(), crime.to_string()));
        self.reply.clone().map_err(anyhow::Error::msg)
    }
}

fn complete_draft() -> CaseFields {
    CaseFields {
        date_time: "2024-01-10T09:00".into(),
        nurej: "1111".into(),
        case_number: "FIS-1".into(),
        city: "Tarija".into(),
        characteristics: "Estafa con documentos falsos".into(),
        parties: "A vs B".into(),
        crime: "Estafa".into(),
        hearing_type: "Cautelares".into(),
        court_room: "Juzgado 2do".into(),
        lawyer: "Dra. Flores".into(),
        ..Default::default()
    }
}

#[test]
fn incomplete_draft_is_refused_before_touching_the_store() {
    let mut store = RecordStore::open(MemorySlot::new());
    let mut form = CaseForm::new();
    form.draft.nurej = "1111".into();
    match form.submit(&mut store) {
        Err(FormError::MissingFields(missing)) => {
            assert!(missing.contains(&"dateTime"));
            assert!(missing.contains(&"lawyer"));
            assert!(!missing.contains(&"nurej"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn new_form_creates_and_edit_form_updates() {
    let mut store = RecordStore::open(MemorySlot::new());
    let mut form = CaseForm::new();
    form.draft = complete_draft();
    let Submitted::Created(created) = form.submit(&mut store).unwrap() else {
        panic!("expected a created case");
    };

    let mut edit = CaseForm::edit(&created);
    assert_eq!(
        edit.mode(),
        &FormMode::Edit {
            id: created.id.clone()
        }
    );
    edit.draft.city = "Oruro".into();
    let outcome = edit.submit(&mut store).unwrap();
    assert_eq!(
        outcome,
        Submitted::Updated {
            id: created.id.clone(),
            found: true
        }
    );
    assert_eq!(store.len(), 1);
    let stored = store.get(&created.id).unwrap();
    assert_eq!(stored.fields.city, "Oruro");
    assert_eq!(stored.created_at, created.created_at);
}

#[test]
fn editing_a_deleted_case_reports_not_found() {
    let mut store = RecordStore::open(MemorySlot::new());
    let created = store.create(complete_draft()).unwrap();
    let form = CaseForm::edit(&created);
    store.delete(&created.id).unwrap();
    let outcome = form.submit(&mut store).unwrap();
    assert_eq!(
        outcome,
        Submitted::Updated {
            id: created.id,
            found: false
        }
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn summary_is_appended_never_replacing() {
    let ai = Canned::ok("Caso de estafa documental.");
    let mut form = CaseForm::new();
    form.draft = complete_draft();
    form.request_summary(&ai).await.unwrap();
    assert_eq!(form.draft.observations, "Resumen IA: Caso de estafa documental.");

    form.request_summary(&ai).await.unwrap();
    assert_eq!(
        form.draft.observations,
        "Resumen IA: Caso de estafa documental.\n\nResumen IA: Caso de estafa documental."
    );
    let seen = ai.seen.lock().unwrap();
    assert_eq!(
        seen[0],
        ("Estafa con documentos falsos".to_string(), "Estafa".to_string())
    );
}

#[tokio::test]
async fn failures_and_blank_answers_become_fixed_notes() {
    let mut form = CaseForm::new();
    form.draft = complete_draft();
    form.draft.observations = "Nota previa".into();
    form.request_summary(&Canned::failing()).await.unwrap();
    assert_eq!(
        form.draft.observations,
        format!("Nota previa\n\nResumen IA: {SUMMARY_FAILED}")
    );
    assert!(!form.is_analyzing());

    let mut form = CaseForm::new();
    form.draft = complete_draft();
    form.request_summary(&Canned::ok("   ")).await.unwrap();
    assert_eq!(form.draft.observations, format!("Resumen IA: {SUMMARY_EMPTY}"));
}

#[test]
fn summary_is_unavailable_without_characteristics_or_while_running() {
    let mut form = CaseForm::new();
    assert!(matches!(
        form.begin_summary(),
        Err(FormError::SummaryUnavailable)
    ));

    form.draft.characteristics = "algo".into();
    let request = form.begin_summary().unwrap();
    assert_eq!(request.characteristics, "algo");
    assert!(form.is_analyzing());
    assert!(!form.can_summarize());
    assert!(matches!(
        form.begin_summary(),
        Err(FormError::SummaryUnavailable)
    ));
    form.finish_summary(Ok("listo".into()));
    assert!(form.can_summarize());
}
