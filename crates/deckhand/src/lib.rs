//! An async client for the deck, card and field operations of AnkiConnect,
//! plus copying a profile's collection and media into a project folder.
//!
//! # Quick Start
//!
//! ```no_run
//! use deckhand::{ClientConfig, DeckClient};
//!
//! # async fn example() -> deckhand::Result<()> {
//! // Resolve settings from ANKI_CONNECT_URL, ANKI_DELAY_MS, APPDATA, ANKI_PROFILE
//! let client = DeckClient::new(ClientConfig::from_env()?);
//!
//! println!("{}", client.check_connection().await);
//!
//! let cards = client.all_card_data("AWS Cloud Practitioner Cert").await?;
//! println!("{} cards", cards.len());
//!
//! client.copy_deck_to_project("./my-project").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Operations
//!
//! - [`DeckClient::check_connection`] - protocol version as a message, never fails
//! - [`DeckClient::deck_names`] - all decks
//! - [`DeckClient::all_card_data`] - every card of a deck
//! - [`DeckClient::field_names`] - field names of a deck, from its first card
//! - [`DeckClient::specific_card_data`] - first card whose field equals a value
//! - [`DeckClient::add_field`] - add a template field, optionally copy the profile afterwards
//! - [`DeckClient::copy_deck_to_project`] - copy `collection.anki2` and `media/`
//!
//! [`DeckClient::lenient`] offers the same operations with failures logged
//! and replaced by empty values.
//!
//! # Requirements
//!
//! - Anki must be running with the [AnkiConnect](https://ankiweb.net/shared/info/2055492159) add-on installed
//! - By default, the client connects to `http://127.0.0.1:8765`

pub mod client;
pub mod config;
pub mod error;
pub mod lenient;
pub mod pacing;
mod project;
pub mod query;
mod request;
pub mod types;

pub use client::{CONNECTION_FAILED, ClientBuilder, DeckClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use lenient::LenientDeckClient;
pub use pacing::{Pacer, PacingPolicy};
pub use types::{
    AddFieldReport, Card, CardField, CardFields, CardId, CopyReport, CopyStage, FieldMatch,
};
