//! Domain types for the deck client.

mod card;
mod report;

pub use card::{Card, CardField, CardFields, CardId, FieldMatch};
pub use report::{AddFieldReport, CopyReport, CopyStage};
