use iurisdata_cases::form::CaseForm;
use iurisdata_cases::form::SUMMARY_FAILED;
use iurisdata_cases::form::Summarizer;
use iurisdata_summary::GeminiConfig;
use iurisdata_summary::GeminiSummarizer;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn config(server: &MockServer, key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: key.map(str::to_string),
        base_url: server.uri(),
        ..GeminiConfig::default()
    }
}

#[tokio::test]
async fn concatenates_first_candidate_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
        .and(header("x-goog-api-key", "secret"))
        .and(body_partial_json(json!({"generationConfig": {"temperature": 0.7}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Resumen "}, {"text": "breve."}]}},
                {"content": {"parts": [{"text": "ignorado"}]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ai = GeminiSummarizer::new(config(&server, Some("secret"))).unwrap();
    let text = ai.summarize("Hurto de celular", "Hurto").await.unwrap();
    assert_eq!(text, "Resumen breve.");
}

#[tokio::test]
async fn prompt_mentions_crime_and_characteristics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let ai = GeminiSummarizer::new(config(&server, Some("k"))).unwrap();
    assert_eq!(ai.summarize("Hurto de celular", "Hurto").await.unwrap(), "");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Delito: Hurto"));
    assert!(prompt.contains("Características: Hurto de celular"));
}

#[tokio::test]
async fn http_errors_surface_as_err() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let ai = GeminiSummarizer::new(config(&server, Some("k"))).unwrap();
    let err = ai.summarize("x", "y").await.unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn missing_key_fails_without_a_request() {
    let server = MockServer::start().await;
    let ai = GeminiSummarizer::new(config(&server, None)).unwrap();
    assert!(ai.summarize("x", "y").await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn form_records_a_fixed_note_when_the_service_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ai = GeminiSummarizer::new(config(&server, Some("k"))).unwrap();
    let mut form = CaseForm::new();
    form.draft.characteristics = "Lesiones leves".into();
    form.request_summary(&ai).await.unwrap();
    assert_eq!(form.draft.observations, format!("Resumen IA: {SUMMARY_FAILED}"));
}
