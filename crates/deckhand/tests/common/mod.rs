//! Common test utilities for deck client tests.

use deckhand::{DeckClient, PacingPolicy};
use serde::Serialize;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Start a new mock server for testing.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a client connected to the mock server, with pacing disabled.
#[allow(dead_code)]
pub fn client_for_mock(server: &MockServer) -> DeckClient {
    DeckClient::builder()
        .url(server.uri())
        .pacing(PacingPolicy::Disabled)
        .build()
}

/// A URL nothing is listening on.
#[allow(dead_code)]
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Create a successful AnkiConnect response.
#[allow(dead_code)]
pub fn mock_anki_response<T: Serialize>(result: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": result,
        "error": null
    }))
}

/// Create a successful response from raw result JSON.
///
/// `json!` sorts object keys, so tests that depend on key order use this.
#[allow(dead_code)]
pub fn mock_anki_raw(result_json: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(r#"{{"result": {}, "error": null}}"#, result_json),
        "application/json",
    )
}

/// Create an error AnkiConnect response.
#[allow(dead_code)]
pub fn mock_anki_error(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "result": null,
        "error": error
    }))
}

/// Mount a mock for a specific action (expect exactly 1 call).
pub async fn mock_action(server: &MockServer, action: &str, response: ResponseTemplate) {
    mock_action_times(server, action, response, 1).await;
}

/// Mount a mock for a specific action with expected call count.
pub async fn mock_action_times(
    server: &MockServer,
    action: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": action,
            "version": 6
        })))
        .respond_with(response)
        .expect(Times::from(times))
        .mount(server)
        .await;
}

/// Mount a mock that must never be called.
#[allow(dead_code)]
pub async fn mock_action_never(server: &MockServer, action: &str) {
    mock_action_times(server, action, mock_anki_response(serde_json::Value::Null), 0).await;
}

/// A `cardsInfo` entry with fields in the given order.
#[allow(dead_code)]
pub fn card_json(card_id: i64, deck: &str, fields: &[(&str, &str)]) -> String {
    let fields: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(order, (name, value))| {
            format!(
                r#"{}: {{"value": {}, "order": {}}}"#,
                serde_json::to_string(name).unwrap(),
                serde_json::to_string(value).unwrap(),
                order
            )
        })
        .collect();
    format!(
        r#"{{"cardId": {}, "note": {}, "deckName": {}, "modelName": "Basic", "fields": {{{}}}}}"#,
        card_id,
        card_id + 1000,
        serde_json::to_string(deck).unwrap(),
        fields.join(", ")
    )
}
