//! Source clients and the full enrichment flow against a local mock server.

use notegloss::note::{FIELD_COLLOCATION, FIELD_EXAMPLE, FIELD_IPA, FIELD_MEANING};
use notegloss::{
    CollectingSink, EnrichConfig, Endpoints, Enricher, FailureReason, HttpSources, LexicalSources,
    MemoryEditor, NoteRecord, SourceKind, fill_editor,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sources_for(server: &MockServer) -> HttpSources {
    HttpSources::new(EnrichConfig {
        endpoints: Endpoints::with_base(&server.uri()),
        timeout: Duration::from_secs(2),
        ..EnrichConfig::default()
    })
    .expect("client builds")
}

fn dictionary_body() -> serde_json::Value {
    json!([{
        "word": "example",
        "phonetic": "",
        "phonetics": [{"text": "", "audio": ""}, {"text": "/ɪɡˈzæmpəl/"}],
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{"definition": "Something that is representative of all such things in a group."}]
        }]
    }])
}

fn concordance_body(count: usize) -> serde_json::Value {
    let lines: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "Left": [{"Str": format!("Line {n} is an ")}],
                "Kwic": [{"Str": "example"}],
                "Right": [{"Str": "."}]
            })
        })
        .collect();
    json!({ "Lines": lines })
}

async fn mount_all(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/entries/en_US/example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dictionary_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/concordance"))
        .and(query_param("query", "example"))
        .and(query_param("lang", "English"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(concordance_body(7)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collocation/example.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<P><A href="/x"><B>good</B></A> example</P>"#),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn dictionary_client_parses_entry_with_ipa_fallback() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let info = sources_for(&server).definitions("example").await.unwrap();

    assert_eq!(info.headword, "example");
    assert_eq!(info.ipa.as_deref(), Some("/ɪɡˈzæmpəl/"));
    assert_eq!(info.meanings.len(), 1);
    assert_eq!(info.meanings[0].part_of_speech, "noun");
}

#[tokio::test]
async fn dictionary_not_found_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/entries/en_US/qwzx"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"title": "No Definitions Found"})),
        )
        .mount(&server)
        .await;

    let err = sources_for(&server).definitions("qwzx").await.unwrap_err();

    assert_eq!(err.origin, SourceKind::Dictionary);
    assert_eq!(err.reason, FailureReason::Status(404));
}

#[tokio::test]
async fn concordance_client_truncates_to_three_lines_in_order() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let lines = sources_for(&server).examples("example").await.unwrap();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].text, "Line 1 is an example.");
    assert_eq!(lines[2].text, "Line 3 is an example.");
    assert_eq!(lines[1].keyword.as_deref(), Some("example"));
}

#[tokio::test]
async fn concordance_empty_lines_are_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/concordance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Lines": []})))
        .mount(&server)
        .await;

    let err = sources_for(&server).examples("example").await.unwrap_err();

    assert_eq!(err.origin, SourceKind::Concordance);
    assert_eq!(err.reason, FailureReason::Empty);
}

#[tokio::test]
async fn collocation_client_sanitizes_markup() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let doc = sources_for(&server).collocations("example").await.unwrap();

    assert_eq!(doc.as_html(), "<p><br><b>good</b><br> example</p>");
}

#[tokio::test]
async fn slow_source_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collocation/example.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let sources = HttpSources::new(EnrichConfig {
        endpoints: Endpoints::with_base(&server.uri()),
        timeout: Duration::from_millis(200),
        ..EnrichConfig::default()
    })
    .unwrap();

    let err = sources.collocations("example").await.unwrap_err();

    assert_eq!(err.reason, FailureReason::Timeout);
}

#[tokio::test]
async fn editor_flow_fills_every_field_once() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let sink = Arc::new(CollectingSink::new());
    let enricher = Enricher::with_sink(sources_for(&server), sink.clone());
    let mut editor = MemoryEditor::new(NoteRecord::with_word("Example"));

    let report = fill_editor(&mut editor, &enricher).await.unwrap();

    assert_eq!(report.succeeded(), 3);
    assert_eq!(editor.refresh_count(), 1);
    assert!(sink.failures().is_empty());

    let note = editor.into_note();
    assert_eq!(note.get_field(FIELD_IPA), Some("/ɪɡˈzæmpəl/"));
    let meaning = note.get_field(FIELD_MEANING).unwrap();
    assert_eq!(meaning.matches("<p><span").count(), 1);
    assert_eq!(meaning.matches("<li>").count(), 1);
    assert!(meaning.ends_with("</li></ul></p>"));
    assert_eq!(note.get_field(FIELD_EXAMPLE).unwrap().matches("<li>").count(), 3);
    assert_eq!(
        note.get_field(FIELD_COLLOCATION),
        Some("<p><br><b>good</b><br> example</p>")
    );
}

#[tokio::test]
async fn editor_flow_survives_a_failing_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/entries/en_US/example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dictionary_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/concordance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(concordance_body(2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collocation/example.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let enricher = Enricher::with_sink(sources_for(&server), sink.clone());
    let mut note = NoteRecord::with_word("example");
    note.set_field(FIELD_COLLOCATION, "<i>mine</i>");
    let mut editor = MemoryEditor::new(note);

    let report = fill_editor(&mut editor, &enricher).await.unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(editor.refresh_count(), 1);
    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].source, SourceKind::Collocation);
    assert_eq!(failures[0].message, "HTTP status 500");

    let note = editor.into_note();
    assert_eq!(note.get_field(FIELD_COLLOCATION), Some("<i>mine</i>"));
    assert_eq!(note.get_field(FIELD_EXAMPLE).unwrap().matches("<li>").count(), 2);
    assert!(!note.get_field(FIELD_MEANING).unwrap().is_empty());
}
