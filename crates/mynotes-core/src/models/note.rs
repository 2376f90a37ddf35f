//! Note model

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::row::{DecodeError, RawRow};

pub(crate) const ID_COLUMN: &str = "id";
pub(crate) const USER_ID_COLUMN: &str = "user_id";
pub(crate) const TEXT_COLUMN: &str = "text";
pub(crate) const SYNCED_COLUMN: &str = "is_sync_with_cloud";

/// A note in the system
///
/// Notes are never edited in place; an update yields a new value with the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    id: i64,
    user_id: i64,
    text: String,
    is_synced_with_cloud: bool,
}

impl Note {
    /// Decode a row of the `note` table
    ///
    /// `text` is nullable in the schema; NULL decodes as an empty note.
    pub fn from_row(row: &RawRow) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.integer(ID_COLUMN)?,
            user_id: row.integer(USER_ID_COLUMN)?,
            text: row.nullable_text(TEXT_COLUMN)?.unwrap_or_default(),
            is_synced_with_cloud: row.integer(SYNCED_COLUMN)? != 0,
        })
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Id of the owning user
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn is_synced_with_cloud(&self) -> bool {
        self.is_synced_with_cloud
    }

    /// Get first line as title preview, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.text
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// Check if note text is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
pub(crate) fn note_row(id: i64, user_id: i64, text: &str, synced: bool) -> RawRow {
    RawRow::new()
        .with(ID_COLUMN, id)
        .with(USER_ID_COLUMN, user_id)
        .with(TEXT_COLUMN, text.to_string())
        .with(SYNCED_COLUMN, i64::from(synced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rusqlite::types::Value;

    #[test]
    fn test_from_row() {
        let note = Note::from_row(&note_row(7, 2, "hello", true)).unwrap();
        assert_eq!(note.id(), 7);
        assert_eq!(note.user_id(), 2);
        assert_eq!(note.text(), "hello");
        assert!(note.is_synced_with_cloud());
    }

    #[test]
    fn test_null_text_decodes_as_empty() {
        let row = note_row(1, 1, "", false).with(TEXT_COLUMN, Value::Null);
        let note = Note::from_row(&row).unwrap();
        assert_eq!(note.text(), "");
        assert!(note.is_empty());
    }

    #[test]
    fn test_sync_flag_mismatch() {
        let row = note_row(1, 1, "x", false).with(SYNCED_COLUMN, "yes".to_string());
        assert_eq!(
            Note::from_row(&row).unwrap_err(),
            DecodeError::TypeMismatch {
                column: SYNCED_COLUMN.to_string(),
                expected: "integer",
                found: "Text".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_user_id() {
        let row = RawRow::new()
            .with(ID_COLUMN, 1_i64)
            .with(TEXT_COLUMN, "x".to_string())
            .with(SYNCED_COLUMN, 0_i64);
        assert_eq!(
            Note::from_row(&row).unwrap_err(),
            DecodeError::MissingColumn(USER_ID_COLUMN.to_string())
        );
    }

    #[test]
    fn test_equality_ignores_contents() {
        let before = Note::from_row(&note_row(3, 1, "old", true)).unwrap();
        let after = Note::from_row(&note_row(3, 1, "new", false)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_title_preview() {
        let note = Note::from_row(&note_row(1, 1, "First line\nSecond line", true)).unwrap();
        assert_eq!(note.title_preview(50), "First line");
        assert_eq!(note.title_preview(5), "First");
    }
}
