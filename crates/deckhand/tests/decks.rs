//! Tests for deck listing.

mod common;

use common::{client_for_mock, mock_action, mock_anki_error, mock_anki_response, setup_mock_server};
use deckhand::Error;

#[tokio::test]
async fn test_deck_names_in_service_order() {
    let server = setup_mock_server().await;
    mock_action(
        &server,
        "deckNames",
        mock_anki_response(vec!["Default", "AWS Cloud Practitioner Cert"]),
    )
    .await;

    let client = client_for_mock(&server);
    let decks = client.deck_names().await.unwrap();

    assert_eq!(decks, vec!["Default", "AWS Cloud Practitioner Cert"]);
}

#[tokio::test]
async fn test_deck_names_service_error() {
    let server = setup_mock_server().await;
    mock_action(&server, "deckNames", mock_anki_error("collection is not available")).await;

    let client = client_for_mock(&server);
    let err = client.deck_names().await.unwrap_err();

    assert!(matches!(err, Error::AnkiConnect(ref msg) if msg.contains("collection")));
}

#[tokio::test]
async fn test_deck_names_empty_response() {
    let server = setup_mock_server().await;
    mock_action(
        &server,
        "deckNames",
        mock_anki_response(serde_json::Value::Null),
    )
    .await;

    let client = client_for_mock(&server);
    let err = client.deck_names().await.unwrap_err();

    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_lenient_deck_names_on_service_error() {
    let server = setup_mock_server().await;
    mock_action(&server, "deckNames", mock_anki_error("boom")).await;

    let client = client_for_mock(&server);
    assert!(client.lenient().deck_names().await.is_empty());
}
