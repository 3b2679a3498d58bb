//! Basic usage example for deckhand.
//!
//! Lists decks and their field names, then copies the profile into a
//! project folder when one is given.
//!
//! Run with: ANKI_PROFILE="User 1" cargo run --example basic -- ./my-project

use deckhand::{ClientConfig, DeckClient};

#[tokio::main]
async fn main() -> deckhand::Result<()> {
    let client = DeckClient::new(ClientConfig::from_env()?);

    println!("{}", client.check_connection().await);

    let decks = client.deck_names().await?;
    println!("\nAvailable decks:");
    for deck in &decks {
        let fields = client.field_names(deck).await?;
        println!("  - {} {:?}", deck, fields);
    }

    if let Some(project) = std::env::args().nth(1) {
        let report = client.copy_deck_to_project(&project).await?;
        println!(
            "\nCopied collection and {} media files ({} bytes) to {}",
            report.media_files, report.bytes_copied, project
        );
    }

    Ok(())
}
