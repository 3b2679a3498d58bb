//! Search query construction.

/// Build the search query that selects every card of a deck.
///
/// The name is wrapped in double quotes so names with spaces or `::`
/// match exactly. Quotes inside the name are not escaped, so a deck
/// name containing `"` produces a query Anki will not parse as intended.
///
/// # Example
///
/// ```
/// use deckhand::query::deck_query;
///
/// assert_eq!(deck_query("AWS Cloud Practitioner Cert"), "deck:\"AWS Cloud Practitioner Cert\"");
/// ```
pub fn deck_query(deck: &str) -> String {
    format!("deck:\"{}\"", deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_query_simple() {
        assert_eq!(deck_query("Default"), "deck:\"Default\"");
    }

    #[test]
    fn test_deck_query_hierarchical() {
        assert_eq!(
            deck_query("Languages::Italian"),
            "deck:\"Languages::Italian\""
        );
    }

    #[test]
    fn test_deck_query_does_not_escape_quotes() {
        assert_eq!(deck_query("Say \"hi\""), "deck:\"Say \"hi\"\"");
    }
}
