//! Outcome types for operations that touch the filesystem.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;

/// Result of copying a profile's collection and media into a project folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Where the collection file was written.
    pub collection: PathBuf,
    /// The destination media directory.
    pub media_dir: PathBuf,
    /// Number of media files copied (recursively).
    pub media_files: usize,
    /// Total bytes written, collection included.
    pub bytes_copied: u64,
}

/// What happened to the project copy requested by
/// [`DeckClient::add_field`](crate::DeckClient::add_field).
#[derive(Debug)]
pub enum CopyStage {
    /// No project folder was given.
    Skipped,
    /// The copy completed.
    Copied(CopyReport),
    /// The field was added but the copy failed.
    Failed(Error),
}

impl CopyStage {
    /// Whether the copy was requested and did not complete.
    pub fn is_failed(&self) -> bool {
        matches!(self, CopyStage::Failed(_))
    }
}

/// Result of adding a field to a deck.
///
/// Reaching this value means the field add succeeded; the copy stage is
/// reported separately so a failed copy is not mistaken for a failed add.
#[derive(Debug)]
pub struct AddFieldReport {
    /// The acknowledgement returned by `addFieldToDeck`.
    pub response: serde_json::Value,
    /// Outcome of the follow-up project copy.
    pub copy: CopyStage,
}
