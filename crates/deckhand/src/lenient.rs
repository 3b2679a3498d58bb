//! Error-swallowing view of [`DeckClient`].
//!
//! Scripts that only want "something or nothing" can call the same
//! operations through [`DeckClient::lenient`]. Every failure is logged at
//! `warn` and replaced by an empty value, so an empty result here does not
//! tell an empty deck apart from an unreachable service. Use the typed
//! methods on [`DeckClient`] when that matters.
//!
//! # Example
//!
//! ```no_run
//! use deckhand::DeckClient;
//!
//! # async fn example() {
//! let client = DeckClient::builder().build();
//! let decks = client.lenient().deck_names().await;
//! println!("{} decks", decks.len());
//! # }
//! ```

use std::path::Path;

use tracing::{info, warn};

use crate::client::DeckClient;
use crate::types::{Card, CopyStage, FieldMatch};

/// Obtained via [`DeckClient::lenient()`].
#[derive(Debug)]
pub struct LenientDeckClient<'a> {
    pub(crate) client: &'a DeckClient,
}

impl<'a> LenientDeckClient<'a> {
    /// Same as [`DeckClient::check_connection`].
    pub async fn check_connection(&self) -> String {
        self.client.check_connection().await
    }

    /// Deck names, or an empty list on error.
    pub async fn deck_names(&self) -> Vec<String> {
        self.client.deck_names().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list decks");
            Vec::new()
        })
    }

    /// Every card of a deck, or an empty list on error.
    pub async fn all_card_data(&self, deck: &str) -> Vec<Card> {
        self.client.all_card_data(deck).await.unwrap_or_else(|e| {
            warn!(deck, error = %e, "Failed to fetch cards");
            Vec::new()
        })
    }

    /// Field names of a deck, or an empty list on error.
    pub async fn field_names(&self, deck: &str) -> Vec<String> {
        self.client.field_names(deck).await.unwrap_or_else(|e| {
            warn!(deck, error = %e, "Failed to fetch field names");
            Vec::new()
        })
    }

    /// First card matching the criteria, or `None` on error.
    pub async fn specific_card_data(&self, deck: &str, criteria: &FieldMatch) -> Option<Card> {
        self.client
            .specific_card_data(deck, criteria)
            .await
            .unwrap_or_else(|e| {
                warn!(
                    deck,
                    field = %criteria.field_name,
                    error = %e,
                    "Failed to search cards"
                );
                None
            })
    }

    /// Add a field and optionally copy the profile; failures are only logged.
    pub async fn add_field(&self, deck: &str, field: &str, project_folder: Option<&Path>) {
        match self.client.add_field(deck, field, project_folder).await {
            Ok(report) => {
                info!(deck, field, "Added field");
                if let CopyStage::Failed(e) = report.copy {
                    warn!(deck, error = %e, "Field added but project copy failed");
                }
            }
            Err(e) => warn!(deck, field, error = %e, "Failed to add field"),
        }
    }

    /// Copy the profile into a project folder; failures are only logged.
    pub async fn copy_deck_to_project(&self, project_folder: impl AsRef<Path>) {
        let project_folder = project_folder.as_ref();
        if let Err(e) = self.client.copy_deck_to_project(project_folder).await {
            warn!(
                project = %project_folder.display(),
                error = %e,
                "Failed to copy deck to project"
            );
        }
    }
}
