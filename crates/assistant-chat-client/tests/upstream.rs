//! End-to-end tests against a mocked upstream.

use assistant_chat_client::{
    relay_turn, AssistantApi, AssistantClient, AssistantConfig, ClientError, CreateAssistant,
    FileUpload, StreamError,
};
use assistant_chat_core::{ChatTurn, Transcript};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/assistant/assistants/docs/chat";
const FILES_PATH: &str = "/assistant/assistants/docs/files";
const ASSISTANTS_PATH: &str = "/assistant/assistants";

fn client_for(server: &MockServer) -> AssistantClient {
    let config = AssistantConfig::new("pk-test", "docs")
        .unwrap()
        .with_base_url(server.uri());
    AssistantClient::new(config).unwrap()
}

fn sse(events: &[&str]) -> ResponseTemplate {
    let body: String = events.iter().map(|e| format!("data: {e}\n\n")).collect();
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

#[tokio::test]
async fn streams_reply_into_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("Api-Key", "pk-test"))
        .and(body_partial_json(json!({
            "stream": true,
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(sse(&[
            r#"{"choices":[{"delta":{"content":"Hi"}}]}"#,
            r#"{"choices":[{"delta":{"content":" there"}}]}"#,
            r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut transcript = Transcript::new();
    let history = transcript.submit("Hello").unwrap();

    let mut stream = client.open_chat("docs", &history).await.unwrap();
    relay_turn(&mut stream, &mut transcript, |_, _| {})
        .await
        .unwrap();

    let messages = transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[1].content, "Hi there");
    assert!(!transcript.is_awaiting());
}

#[tokio::test]
async fn duplicate_references_are_collapsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(sse(&[
            r#"{"choices":[{"delta":{"content":"A","references":[{"file_id":"f1","quote":"q1"}]}}]}"#,
            r#"{"choices":[{"delta":{"references":[{"file_id":"f1","quote":"q2"}]}}]}"#,
            r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut transcript = Transcript::new();
    let history = transcript.submit("cite").unwrap();
    let mut stream = client.open_chat("docs", &history).await.unwrap();
    relay_turn(&mut stream, &mut transcript, |_, _| {})
        .await
        .unwrap();

    let reply = transcript.last_reply().unwrap();
    assert_eq!(reply.content, "A");
    assert_eq!(reply.references.len(), 1);
    assert_eq!(reply.references[0].quote, "q1");
    assert_eq!(transcript.referenced_files().len(), 1);
}

#[tokio::test]
async fn malformed_event_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(sse(&[
            r#"{"choices":[{"delta":{"content":"A"}}]}"#,
            "{not json",
            r#"{"choices":[{"delta":{"content":"B"}}]}"#,
            r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#,
        ]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut transcript = Transcript::new();
    let history = transcript.submit("q").unwrap();
    let mut stream = client.open_chat("docs", &history).await.unwrap();
    relay_turn(&mut stream, &mut transcript, |_, _| {})
        .await
        .unwrap();

    assert_eq!(transcript.last_reply().unwrap().content, "AB");
    assert!(transcript.error().is_none());
}

#[tokio::test]
async fn stream_without_finish_keeps_partial_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(sse(&[r#"{"choices":[{"delta":{"content":"half"}}]}"#]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut transcript = Transcript::new();
    let history = transcript.submit("q").unwrap();
    let mut stream = client.open_chat("docs", &history).await.unwrap();
    let err = relay_turn(&mut stream, &mut transcript, |_, _| {})
        .await
        .unwrap_err();

    assert_eq!(err, StreamError::Incomplete);
    assert_eq!(transcript.last_reply().unwrap().content, "half");
    assert!(!transcript.is_awaiting());
}

#[tokio::test]
async fn non_success_status_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "Assistant not found"}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let Err(err) = client.open_chat("docs", &[ChatTurn::user("q")]).await else {
        panic!("Expected upstream error");
    };

    match err {
        ClientError::Upstream { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Assistant not found");
        }
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_endpoint_override_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proxy/chat"))
        .respond_with(sse(&[r#"{"finish_reason":"stop"}"#]))
        .expect(1)
        .mount(&server)
        .await;

    let config = AssistantConfig::new("pk-test", "docs")
        .unwrap()
        .with_chat_endpoint(Some(format!("{}/proxy/chat", server.uri())));
    let client = AssistantClient::new(config).unwrap();

    let mut stream = client.open_chat("docs", &[ChatTurn::user("q")]).await.unwrap();
    assert!(stream.next_event().await.unwrap().unwrap().is_finish());
}

#[tokio::test]
async fn unreachable_endpoint_is_connection_error() {
    let config = AssistantConfig::new("pk-test", "docs")
        .unwrap()
        .with_base_url("http://127.0.0.1:1");
    let client = AssistantClient::new(config).unwrap();

    let Err(err) = client.open_chat("docs", &[ChatTurn::user("q")]).await else {
        panic!("Expected connection error");
    };
    assert!(matches!(err, ClientError::Connection(_)));
}

#[tokio::test]
async fn lists_files_in_both_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(header("Api-Key", "pk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{"id": "f1", "name": "a.pdf", "size": 10, "status": "Available"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assistant/assistants/other/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "f2", "name": "b.txt"}])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);

    let files = client.list_files("docs").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].id, "f1");
    assert_eq!(files[0].size_bytes, Some(10));

    let files = client.list_files("other").await.unwrap();
    assert_eq!(files[0].name, "b.txt");
}

#[tokio::test]
async fn uploads_multipart_file_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FILES_PATH))
        .and(header("Api-Key", "pk-test"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"notes.txt\""))
        .and(body_string_contains("name=\"metadata\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f9", "name": "notes.txt", "status": "Processing"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let upload = FileUpload::new("notes.txt", b"hello".to_vec())
        .with_content_type("text/plain")
        .with_metadata(json!({"team": "docs"}));

    let file = client.upload_file("docs", upload).await.unwrap();
    assert_eq!(file.id, "f9");
    assert_eq!(file.status.as_deref(), Some("Processing"));
}

#[tokio::test]
async fn rejected_upload_keeps_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FILES_PATH))
        .respond_with(ResponseTemplate::new(413).set_body_string("file too large"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .upload_file("docs", FileUpload::new("big.bin", vec![0_u8; 8]))
        .await
        .unwrap_err();

    assert_eq!(err.upstream_status(), Some(413));
    assert!(err.to_string().contains("file too large"));
}

#[tokio::test]
async fn checks_assistant_existence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ASSISTANTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assistants": [{"name": "docs", "status": "Ready"}, {"name": "support"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.assistant_exists("docs").await.unwrap());
    assert!(!client.assistant_exists("missing").await.unwrap());
}

#[tokio::test]
async fn creates_assistant_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ASSISTANTS_PATH))
        .and(body_partial_json(json!({
            "name": "fresh",
            "model": {"name": "gpt-4o"},
            "region": "us-east-1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "fresh", "status": "Initializing"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let info = client
        .create_assistant(&CreateAssistant::new("fresh"))
        .await
        .unwrap();
    assert_eq!(info.name, "fresh");
    assert_eq!(info.status.as_deref(), Some("Initializing"));
}
