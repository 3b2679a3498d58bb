//! Client configuration.
//!
//! [`ClientConfig`] is a plain value fixed when the client is built. The
//! client never reads the environment on its own; callers that want
//! environment-driven settings resolve them with [`ClientConfig::from_env`]
//! and pass the result to [`DeckClient::new`](crate::DeckClient::new).
//!
//! | Variable | Effect |
//! |---|---|
//! | `ANKI_CONNECT_URL` | AnkiConnect base URL |
//! | `ANKI_DELAY_MS` | fixed delay before each operation (`0` disables pacing) |
//! | `APPDATA` | application data root (falls back to the platform data directory) |
//! | `ANKI_PROFILE` | Anki profile name; the data directory is `<root>/Anki2/<profile>` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::pacing::PacingPolicy;

/// Default URL for AnkiConnect.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8765";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the AnkiConnect URL.
pub const URL_ENV: &str = "ANKI_CONNECT_URL";
/// Environment variable holding the pacing delay in milliseconds.
pub const DELAY_ENV: &str = "ANKI_DELAY_MS";
/// Environment variable holding the application data root.
pub const APP_DATA_ENV: &str = "APPDATA";
/// Environment variable holding the Anki profile name.
pub const PROFILE_ENV: &str = "ANKI_PROFILE";

/// Directory Anki keeps its profiles in, under the application data root.
pub const ANKI_DIR: &str = "Anki2";
/// Name of the collection database inside a profile directory.
pub const COLLECTION_FILE: &str = "collection.anki2";
/// Name of the media directory inside a profile directory.
pub const MEDIA_DIR: &str = "media";

/// Immutable settings for a [`DeckClient`](crate::DeckClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// AnkiConnect base URL.
    pub url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Wait applied before each operation.
    pub pacing: PacingPolicy,
    /// Profile data directory holding `collection.anki2` and `media/`.
    ///
    /// Only the project copy needs it.
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            pacing: PacingPolicy::default(),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Resolve a configuration from the process environment.
    ///
    /// Unset variables keep their defaults. Without a profile name the
    /// data directory stays unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(URL_ENV) {
            config.url = url;
        }

        if let Some(raw) = get(DELAY_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    DELAY_ENV, raw
                ))
            })?;
            config.pacing = if millis == 0 {
                PacingPolicy::Disabled
            } else {
                PacingPolicy::FixedDelay(Duration::from_millis(millis))
            };
        }

        if let Some(profile) = get(PROFILE_ENV) {
            let root = get(APP_DATA_ENV)
                .map(PathBuf::from)
                .or_else(dirs::data_dir)
                .ok_or_else(|| {
                    Error::Config(format!(
                        "{} is set but no application data directory could be determined",
                        PROFILE_ENV
                    ))
                })?;
            config.data_dir = Some(Self::data_dir_from(root, &profile));
        }

        Ok(config)
    }

    /// Compose a profile data directory from an application data root and a
    /// profile name: `<root>/Anki2/<profile>`.
    pub fn data_dir_from(root: impl AsRef<Path>, profile: &str) -> PathBuf {
        root.as_ref().join(ANKI_DIR).join(profile)
    }
}
