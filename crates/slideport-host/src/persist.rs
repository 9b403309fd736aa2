//! Deck file reads and atomic writes.
//!
//! Writes go to a temporary file in the destination directory, are synced,
//! and are then renamed over the target. A failed save never leaves a
//! truncated document behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::deck::{Deck, DeckFile, DECK_FORMAT_VERSION};
use crate::error::HostError;

/// Serializes a deck into its on-disk representation.
pub fn encode_deck(deck: &Deck) -> Result<Vec<u8>, HostError> {
    let file = DeckFile {
        format_version: DECK_FORMAT_VERSION,
        deck: deck.clone(),
    };
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Reads a deck file. Handles in the returned deck are unassigned.
pub fn read_deck(path: &Path) -> Result<Deck, HostError> {
    let bytes = fs::read(path).map_err(|e| HostError::io(e, path))?;
    let file: DeckFile = serde_json::from_slice(&bytes)?;
    if file.format_version > DECK_FORMAT_VERSION {
        return Err(HostError::OpenRejected {
            path: path.to_path_buf(),
            reason: format!(
                "deck format version {} is newer than supported version {}",
                file.format_version, DECK_FORMAT_VERSION
            ),
        });
    }
    Ok(file.deck)
}

/// Replaces `path` with `bytes` atomically.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HostError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| HostError::io(e, path))?;
    tmp.write_all(bytes).map_err(|e| HostError::io(e, path))?;
    tmp.as_file().sync_all().map_err(|e| HostError::io(e, path))?;
    tmp.persist(path)
        .map_err(|e| HostError::io(e.error, path))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "deck written");
    Ok(())
}
