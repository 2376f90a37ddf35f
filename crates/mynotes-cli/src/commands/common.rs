use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use mynotes_core::{Error, InMemoryIdentityProvider, Note, NotesService, User};
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliError;

/// Everything a command needs, built once in `main`
pub struct Context {
    pub service: NotesService,
    pub config: CliConfig,
    pub config_path: PathBuf,
    /// `--email` override
    pub email: Option<String>,
}

impl Context {
    /// Identity provider holding whoever this invocation acts as
    pub fn identity(&self) -> InMemoryIdentityProvider {
        self.config
            .resolve_email(self.email.as_deref())
            .map_or_else(InMemoryIdentityProvider::new, InMemoryIdentityProvider::signed_in)
    }

    /// Make the signed-in user active, creating it locally on first use
    pub async fn require_user(&self) -> Result<User, CliError> {
        match self.service.sign_in(&self.identity()).await {
            Ok(user) => Ok(user),
            Err(Error::NotAuthenticated) => Err(CliError::NotSignedIn),
            Err(error) => Err(error.into()),
        }
    }

    pub fn save_config(&self, config: &CliConfig) -> Result<(), CliError> {
        config
            .save_to_path(&self.config_path)
            .map_err(CliError::Config)
    }
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub user_id: i64,
    pub preview: String,
    pub text: String,
    pub synced: bool,
}

/// The active user's notes as the service currently publishes them
pub async fn current_notes(ctx: &Context) -> Result<Vec<Note>, CliError> {
    ctx.require_user().await?;
    let mut view = ctx.service.all_notes();
    Ok(view.next().await.transpose()?.unwrap_or_default())
}

/// A note owned by the acting user. Other users' notes read as missing.
pub async fn owned_note(ctx: &Context, id: i64) -> Result<Note, CliError> {
    let user = ctx.require_user().await?;
    let note = ctx.service.get_note(id).await?;
    if note.user_id() == user.id() {
        Ok(note)
    } else {
        Err(Error::NoteNotFound(id).into())
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let preview = note_preview(note, 40);
            let marker = if note.is_synced_with_cloud() { " " } else { "*" };
            format!("{:>6} {marker} {preview}", note.id())
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id(),
        user_id: note.user_id(),
        preview: note_preview(note, 80),
        text: note.text().to_string(),
        synced: note.is_synced_with_cloud(),
    }
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.text().lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        "(empty)".to_string()
    } else if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn resolve_note_content(content_parts: &[String]) -> Result<String, CliError> {
    if let Some(content) = normalize_content(&content_parts.join(" ")) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_email_arg(email: &str) -> Result<String, CliError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyEmail)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("mynotes-note-{}-{now}.txt", std::process::id()))
}
