//! The deck client and its builder.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::lenient::LenientDeckClient;
use crate::pacing::{Pacer, PacingPolicy};
use crate::project;
use crate::query::deck_query;
use crate::request::{AnkiRequest, AnkiResponse};
use crate::types::{AddFieldReport, Card, CardId, CopyReport, CopyStage, FieldMatch};

/// Message returned by [`DeckClient::check_connection`] when the service
/// cannot be reached.
pub const CONNECTION_FAILED: &str = "Could not connect to AnkiConnect";

#[derive(Serialize)]
struct FindCardsParams<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct CardsInfoParams<'a> {
    cards: &'a [CardId],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddFieldToDeckParams<'a> {
    deck_name: &'a str,
    field_name: &'a str,
}

/// Client for deck, card and field operations against AnkiConnect, plus
/// copying the profile's files into a project folder.
///
/// Every operation waits on the configured [`PacingPolicy`] first, then
/// runs its requests strictly in sequence.
///
/// # Example
///
/// ```no_run
/// use deckhand::{DeckClient, FieldMatch};
///
/// # async fn example() -> deckhand::Result<()> {
/// let client = DeckClient::builder().build();
///
/// println!("{}", client.check_connection().await);
///
/// for deck in client.deck_names().await? {
///     println!("{}: {:?}", deck, client.field_names(&deck).await?);
/// }
///
/// let card = client
///     .specific_card_data("Japanese", &FieldMatch::new("Front", "猫"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeckClient {
    http_client: Client,
    config: Arc<ClientConfig>,
    pacer: Arc<Pacer>,
}

impl DeckClient {
    /// Create a client from a resolved configuration.
    pub fn new(config: ClientConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            pacer: Arc::new(Pacer::new(config.pacing)),
            config: Arc::new(config),
        }
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The profile data directory, if configured.
    pub fn data_dir(&self) -> Option<&Path> {
        self.config.data_dir.as_deref()
    }

    /// A view of this client that logs failures and returns empty values
    /// instead of errors.
    pub fn lenient(&self) -> LenientDeckClient<'_> {
        LenientDeckClient { client: self }
    }

    /// Check that AnkiConnect is reachable.
    ///
    /// Returns a message carrying the protocol version, or
    /// [`CONNECTION_FAILED`] on any error. Never fails.
    pub async fn check_connection(&self) -> String {
        match self.version().await {
            Ok(version) => format!("Connected to AnkiConnect (protocol version {})", version),
            Err(e) => {
                warn!(error = %e, "AnkiConnect connection check failed");
                CONNECTION_FAILED.to_string()
            }
        }
    }

    /// Get the AnkiConnect protocol version.
    pub async fn version(&self) -> Result<u16> {
        self.pacer.pace().await;
        self.invoke_without_params("version").await
    }

    /// Get all deck names, in the order the service lists them.
    pub async fn deck_names(&self) -> Result<Vec<String>> {
        self.pacer.pace().await;
        self.invoke_without_params("deckNames").await
    }

    /// Find cards matching an Anki search query.
    pub async fn find_cards(&self, query: &str) -> Result<Vec<CardId>> {
        self.pacer.pace().await;
        self.find_cards_unpaced(query).await
    }

    /// Get detailed information about cards.
    pub async fn cards_info(&self, card_ids: &[CardId]) -> Result<Vec<Card>> {
        self.pacer.pace().await;
        self.cards_info_unpaced(card_ids).await
    }

    /// Get every card in a deck.
    ///
    /// Searches with `deck:"<deck>"`, then fetches all matches in one
    /// `cardsInfo` call. An empty search returns immediately without the
    /// second request.
    pub async fn all_card_data(&self, deck: &str) -> Result<Vec<Card>> {
        self.pacer.pace().await;

        let card_ids = self.find_cards_unpaced(&deck_query(deck)).await?;
        if card_ids.is_empty() {
            debug!(deck, "Deck has no cards");
            return Ok(Vec::new());
        }

        self.cards_info_unpaced(&card_ids).await
    }

    /// Get the field names used by a deck's cards.
    ///
    /// Only the first card is inspected. Returns an empty list for an empty
    /// deck and [`Error::MalformedCard`] if the first card has no `fields`.
    pub async fn field_names(&self, deck: &str) -> Result<Vec<String>> {
        let cards = self.all_card_data(deck).await?;
        let Some(first) = cards.first() else {
            return Ok(Vec::new());
        };

        let fields = first.fields.as_ref().ok_or_else(|| {
            Error::MalformedCard(format!(
                "card {} in deck '{}' has no fields",
                first.card_id, deck
            ))
        })?;

        Ok(fields.names().map(str::to_string).collect())
    }

    /// Find the first card in a deck whose field equals a value exactly.
    ///
    /// Scans every card of the deck in service order; cost is linear in the
    /// deck size on each call.
    pub async fn specific_card_data(
        &self,
        deck: &str,
        criteria: &FieldMatch,
    ) -> Result<Option<Card>> {
        let cards = self.all_card_data(deck).await?;
        Ok(cards.into_iter().find(|card| criteria.matches(card)))
    }

    /// Add a field to a deck's card template.
    ///
    /// When `project_folder` is given, the profile is copied there after the
    /// field is added. A failed add is returned as an error; a failed copy
    /// is reported in [`AddFieldReport::copy`].
    pub async fn add_field(
        &self,
        deck: &str,
        field: &str,
        project_folder: Option<&Path>,
    ) -> Result<AddFieldReport> {
        self.pacer.pace().await;

        let response = self
            .invoke_acknowledged(
                "addFieldToDeck",
                AddFieldToDeckParams {
                    deck_name: deck,
                    field_name: field,
                },
            )
            .await?;
        debug!(deck, field, "Added field");

        let copy = match project_folder {
            None => CopyStage::Skipped,
            Some(folder) => match self.copy_deck_to_project(folder).await {
                Ok(report) => CopyStage::Copied(report),
                Err(e) => CopyStage::Failed(e),
            },
        };

        Ok(AddFieldReport { response, copy })
    }

    /// Copy the profile's collection file and media directory into a
    /// project folder.
    ///
    /// See [`Error::CollectionCopy`] and [`Error::MediaCopy`] for how a
    /// failure tells which stage broke.
    pub async fn copy_deck_to_project(
        &self,
        project_folder: impl AsRef<Path>,
    ) -> Result<CopyReport> {
        self.pacer.pace().await;
        let data_dir = self.data_dir().ok_or(Error::DataDirNotConfigured)?;
        project::copy_to_project(data_dir, project_folder.as_ref())
    }

    async fn find_cards_unpaced(&self, query: &str) -> Result<Vec<CardId>> {
        self.invoke("findCards", FindCardsParams { query }).await
    }

    async fn cards_info_unpaced(&self, card_ids: &[CardId]) -> Result<Vec<Card>> {
        self.invoke("cardsInfo", CardsInfoParams { cards: card_ids }).await
    }

    /// Execute an action without parameters.
    async fn invoke_without_params<R>(&self, action: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let request = AnkiRequest::<()>::without_params(action);
        let response: AnkiResponse<R> = self.send_request(&request).await?;
        into_result(response)
    }

    /// Execute an action with parameters.
    async fn invoke<P, R>(&self, action: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = AnkiRequest::new(action, params);
        let response: AnkiResponse<R> = self.send_request(&request).await?;
        into_result(response)
    }

    /// Execute an action whose result is an acknowledgement that may be null.
    async fn invoke_acknowledged<P>(&self, action: &str, params: P) -> Result<serde_json::Value>
    where
        P: Serialize,
    {
        let request = AnkiRequest::new(action, params);
        let response: AnkiResponse<serde_json::Value> = self.send_request(&request).await?;

        match response.error {
            Some(err) => Err(Error::AnkiConnect(err)),
            None => Ok(response.result.unwrap_or(serde_json::Value::Null)),
        }
    }

    /// Send a request to AnkiConnect and decode the envelope.
    async fn send_request<T, R>(&self, request: &AnkiRequest<'_, T>) -> Result<AnkiResponse<R>>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        debug!(action = request.action, url = %self.config.url, "Sending AnkiConnect request");

        let response = self
            .http_client
            .post(&self.config.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::ConnectionRefused
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn into_result<R>(response: AnkiResponse<R>) -> Result<R> {
    match (response.result, response.error) {
        (Some(result), None) => Ok(result),
        (_, Some(err)) => Err(Error::AnkiConnect(err)),
        (None, None) => Err(Error::EmptyResponse),
    }
}

impl Default for DeckClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

/// Builder for creating a customized [`DeckClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use deckhand::{DeckClient, PacingPolicy};
///
/// let client = DeckClient::builder()
///     .url("http://localhost:8765")
///     .timeout(Duration::from_secs(60))
///     .pacing(PacingPolicy::Disabled)
///     .data_dir("/home/me/.local/share/Anki2/User 1")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the AnkiConnect URL.
    ///
    /// Defaults to `http://127.0.0.1:8765`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config.timeout = duration;
        self
    }

    /// Set the pacing policy.
    pub fn pacing(mut self, policy: PacingPolicy) -> Self {
        self.config.pacing = policy;
        self
    }

    /// Set the profile data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(dir.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> DeckClient {
        DeckClient::new(self.config)
    }
}
