//! Command-line runner for the deckhand AnkiConnect client.
//!
//! Settings come from the environment (`ANKI_CONNECT_URL`, `ANKI_DELAY_MS`,
//! `APPDATA`, `ANKI_PROFILE`) and can be overridden with flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use deckhand::config::PROFILE_ENV;
use deckhand::{ClientConfig, CopyStage, DeckClient, FieldMatch, PacingPolicy};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI Arguments
// ============================================================================

/// Query AnkiConnect decks and copy Anki profile files into a project.
#[derive(Parser, Debug)]
#[command(name = "deckhand")]
#[command(version, about, long_about = None)]
struct Args {
    /// AnkiConnect URL (overrides ANKI_CONNECT_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Delay before each operation in milliseconds, 0 disables (overrides ANKI_DELAY_MS)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Anki profile data directory (overrides APPDATA/ANKI_PROFILE)
    #[arg(long, global = true, conflicts_with = "profile")]
    data_dir: Option<PathBuf>,

    /// Anki profile name, resolved under the application data root (overrides ANKI_PROFILE)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that AnkiConnect is reachable
    Check,
    /// List all deck names
    Decks,
    /// Print every card in a deck as JSON
    Cards {
        /// Deck name
        deck: String,
    },
    /// List the field names used by a deck
    Fields {
        /// Deck name
        deck: String,
    },
    /// Print the first card whose field equals a value
    Find {
        /// Deck name
        deck: String,
        /// Field to compare
        field: String,
        /// Exact value to look for
        value: String,
    },
    /// Add a field to a deck's card template
    AddField {
        /// Deck name
        deck: String,
        /// Name of the new field
        field: String,
        /// Copy the profile into this folder afterwards
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Copy the collection file and media directory into a project folder
    Copy {
        /// Destination project folder
        project: PathBuf,
    },
}

// ============================================================================
// Configuration
// ============================================================================

fn resolve_config(args: &Args) -> deckhand::Result<ClientConfig> {
    let mut config = ClientConfig::from_lookup(|key| match (key, &args.profile) {
        (PROFILE_ENV, Some(profile)) => Some(profile.clone()),
        _ => std::env::var(key).ok(),
    })?;

    if let Some(url) = &args.url {
        config.url = url.clone();
    }

    if let Some(millis) = args.delay_ms {
        config.pacing = match millis {
            0 => PacingPolicy::Disabled,
            ms => PacingPolicy::FixedDelay(Duration::from_millis(ms)),
        };
    }

    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    info!(
        anki_url = %config.url,
        pacing = ?config.pacing,
        data_dir = ?config.data_dir,
        "Starting deckhand"
    );

    let client = DeckClient::new(config);

    match args.command {
        Command::Check => println!("{}", client.check_connection().await),
        Command::Decks => {
            for deck in client.deck_names().await? {
                println!("{}", deck);
            }
        }
        Command::Cards { deck } => print_json(&client.all_card_data(&deck).await?)?,
        Command::Fields { deck } => {
            for field in client.field_names(&deck).await? {
                println!("{}", field);
            }
        }
        Command::Find { deck, field, value } => {
            let criteria = FieldMatch::new(field, value);
            match client.specific_card_data(&deck, &criteria).await? {
                Some(card) => print_json(&card)?,
                None => {
                    eprintln!(
                        "No card in '{}' has {} = {:?}",
                        deck, criteria.field_name, criteria.search_value
                    );
                    std::process::exit(1);
                }
            }
        }
        Command::AddField {
            deck,
            field,
            project,
        } => {
            let report = client.add_field(&deck, &field, project.as_deref()).await?;
            println!("Added field '{}' to '{}'", field, deck);
            match report.copy {
                CopyStage::Skipped => {}
                CopyStage::Copied(copy) => print_json(&copy)?,
                CopyStage::Failed(e) => {
                    eprintln!("Field added, but copying to the project failed: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Command::Copy { project } => print_json(&client.copy_deck_to_project(&project).await?)?,
    }

    Ok(())
}
