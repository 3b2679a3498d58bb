//! Card-related types.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a card, as returned by `findCards`.
pub type CardId = i64;

/// A card as returned by `cardsInfo`.
///
/// Only `fields` matters to the deck operations; the remaining attributes
/// default when the service omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// The card ID.
    #[serde(default)]
    pub card_id: CardId,
    /// The note this card was generated from.
    #[serde(default, rename = "note", alias = "noteId")]
    pub note_id: i64,
    /// The deck this card belongs to.
    #[serde(default)]
    pub deck_name: String,
    /// The note type (model) name.
    #[serde(default)]
    pub model_name: String,
    /// The card's question side (HTML).
    #[serde(default)]
    pub question: String,
    /// The card's answer side (HTML).
    #[serde(default)]
    pub answer: String,
    /// Field values from the note, in the order the service sent them.
    ///
    /// `None` when the service omitted the attribute entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<CardFields>,
    /// The card type (0 = new, 1 = learning, 2 = review, 3 = relearning).
    #[serde(default, rename = "type")]
    pub card_type: i32,
    /// The queue the card is in.
    #[serde(default)]
    pub queue: i32,
    /// Due position/date.
    #[serde(default)]
    pub due: i64,
    /// Current interval in days.
    #[serde(default)]
    pub interval: i64,
    /// Ease factor (2500 = 250%).
    #[serde(default)]
    pub factor: i64,
    /// Number of reviews.
    #[serde(default)]
    pub reps: i64,
    /// Number of lapses.
    #[serde(default)]
    pub lapses: i64,
    /// Last modification timestamp.
    #[serde(default, rename = "mod")]
    pub mod_time: i64,
}

impl Card {
    /// Value of the named field, if the card has it.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(name))
            .map(|field| field.value.as_str())
    }
}

/// A single field value on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    /// The field value (HTML).
    pub value: String,
    /// The field's position in the note type.
    #[serde(default)]
    pub order: i32,
}

impl CardField {
    /// Create a field with the given value and position.
    pub fn new(value: impl Into<String>, order: i32) -> Self {
        Self {
            value: value.into(),
            order,
        }
    }
}

/// The `fields` mapping of a card.
///
/// Keeps entries in the order they appeared in the JSON object, so the
/// field names reported for a deck match what the service returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields(Vec<(String, CardField)>);

impl CardFields {
    /// Look up a field by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&CardField> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// Field names in service order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, CardField)> for CardFields {
    fn from_iter<I: IntoIterator<Item = (K, CardField)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for CardFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, field) in &self.0 {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CardFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = CardFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to field object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, CardField)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, field)) = access.next_entry::<String, CardField>()? {
                    // JSON objects may repeat a key; the last value wins.
                    match entries.iter_mut().find(|entry| entry.0 == key) {
                        Some(entry) => entry.1 = field,
                        None => entries.push((key, field)),
                    }
                }
                Ok(CardFields(entries))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Criteria for [`DeckClient::specific_card_data`](crate::DeckClient::specific_card_data).
///
/// Matches cards whose field `field_name` has exactly `search_value`
/// (case-sensitive, no partial match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// The field to compare.
    pub field_name: String,
    /// The value the field must equal.
    pub search_value: String,
}

impl FieldMatch {
    /// Create match criteria.
    pub fn new(field_name: impl Into<String>, search_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            search_value: search_value.into(),
        }
    }

    /// Whether the card satisfies these criteria.
    pub fn matches(&self, card: &Card) -> bool {
        card.field_value(&self.field_name) == Some(self.search_value.as_str())
    }
}
