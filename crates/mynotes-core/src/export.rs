//! Note export rendering shared by front ends.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::Note;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable note representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNote {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub is_synced_with_cloud: bool,
}

#[must_use]
pub fn note_to_export_item(note: &Note) -> ExportNote {
    ExportNote {
        id: note.id(),
        user_id: note.user_id(),
        text: note.text().to_string(),
        is_synced_with_cloud: note.is_synced_with_cloud(),
    }
}

/// Render notes as pretty-printed JSON.
pub fn render_json_export(notes: &[Note]) -> serde_json::Result<String> {
    let items = notes
        .iter()
        .map(note_to_export_item)
        .collect::<Vec<ExportNote>>();
    serde_json::to_string_pretty(&items)
}

/// Render notes in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(notes: &[Note]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", note.id());
        let _ = writeln!(output, "user_id: {}", note.user_id());
        let _ = writeln!(output, "synced: {}", note.is_synced_with_cloud());
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        output.push_str(note.text());
        output.push('\n');
    }

    output
}

/// Render notes based on selected export format.
pub fn render_notes_export(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes),
        ExportFormat::Markdown => Ok(render_markdown_export(notes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::note_row;
    use pretty_assertions::assert_eq;

    fn note(id: i64, text: &str, synced: bool) -> Note {
        Note::from_row(&note_row(id, 1, text, synced)).unwrap()
    }

    #[test]
    fn render_markdown_export_includes_frontmatter_and_content() {
        let rendered = render_markdown_export(&[note(3, "Hello export", false)]);
        assert_eq!(
            rendered,
            "---\nid: 3\nuser_id: 1\nsynced: false\n---\n\nHello export\n"
        );
    }

    #[test]
    fn render_markdown_export_separates_notes() {
        let rendered = render_markdown_export(&[note(1, "a", true), note(2, "b", true)]);
        assert!(rendered.contains("a\n\n---\nid: 2"));
    }

    #[test]
    fn render_json_export_round_trips_fields() {
        let rendered = render_json_export(&[note(5, "json body", true)]).unwrap();
        let parsed: Vec<ExportNote> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed,
            vec![ExportNote {
                id: 5,
                user_id: 1,
                text: "json body".to_string(),
                is_synced_with_cloud: true,
            }]
        );
    }

    #[test]
    fn export_extension_matches_format() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }
}
