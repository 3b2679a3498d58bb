//! Error types for the deckhand crate.
//!
//! Every typed operation on [`DeckClient`](crate::DeckClient) returns
//! [`Result`]. The variants separate the cases a caller usually wants to
//! tell apart:
//!
//! - [`Error::ConnectionRefused`]: Anki is not running or AnkiConnect is not installed
//! - [`Error::AnkiConnect`]: the service rejected the action (unknown deck, bad query)
//! - [`Error::MalformedCard`]: the service answered but a card lacked its `fields`
//! - [`Error::CollectionCopy`] / [`Error::MediaCopy`]: which copy stage failed
//! - [`Error::ProjectOverlapsProfile`]: the project folder would overwrite the profile itself
//!
//! # Example
//!
//! ```no_run
//! use deckhand::{DeckClient, Error};
//!
//! # async fn example() {
//! let client = DeckClient::builder().build();
//!
//! match client.field_names("Japanese").await {
//!     Ok(fields) if fields.is_empty() => println!("deck has no cards"),
//!     Ok(fields) => println!("fields: {:?}", fields),
//!     Err(Error::ConnectionRefused) => eprintln!("Please start Anki with AnkiConnect installed"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The error type for deck client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP/network error from reqwest.
    ///
    /// For connection issues, see [`Error::ConnectionRefused`].
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("AnkiConnect responded with HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// AnkiConnect returned an error message.
    #[error("AnkiConnect error: {0}")]
    AnkiConnect(String),

    /// Response carried neither a result nor an error.
    #[error("AnkiConnect returned empty response")]
    EmptyResponse,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection refused - Anki is likely not running.
    #[error("Could not connect to Anki. Is Anki running with AnkiConnect installed?")]
    ConnectionRefused,

    /// A card returned by the service is missing data the operation needs.
    #[error("Malformed card data: {0}")]
    MalformedCard(String),

    /// A filesystem operation was requested but no profile data directory is configured.
    #[error("No Anki profile data directory configured")]
    DataDirNotConfigured,

    /// Copying the collection file failed. Nothing was copied.
    #[error("Failed to copy collection '{}' to '{}': {source}", from.display(), to.display())]
    CollectionCopy {
        /// Source collection file.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Copying the media directory failed.
    ///
    /// The collection file had already been copied when this happens, and
    /// the destination media directory may be partially written.
    #[error("Failed to copy media '{}' to '{}': {source}", from.display(), to.display())]
    MediaCopy {
        /// Path being copied when the failure happened.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The project folder overlaps the profile's collection or media
    /// directory. Nothing was copied.
    #[error(
        "Project folder '{}' overlaps the Anki profile at '{}'",
        project.display(),
        data_dir.display()
    )]
    ProjectOverlapsProfile {
        /// Requested project folder.
        project: PathBuf,
        /// Profile data directory.
        data_dir: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A specialized Result type for deck client operations.
pub type Result<T> = std::result::Result<T, Error>;
