use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mynotes")]
#[command(about = "Keep per-user text notes in a local database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding notes.db (defaults to the documents directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Act as this user instead of the logged-in one
    #[arg(long, global = true, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Quick capture: mynotes "my thought here"
    #[arg(trailing_var_arg = true)]
    pub note: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remember an email as the signed-in user
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
    },
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Request a verification email for the signed-in user
    Verify,
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note text
        content: Vec<String>,
    },
    /// List your notes
    List {
        /// List every note in the store, whoever owns it
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a note
    Show {
        /// Note ID
        id: i64,
    },
    /// Replace the text of a note
    Edit {
        /// Note ID
        id: i64,
        /// New text (opens $EDITOR when omitted)
        content: Vec<String>,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: i64,
    },
    /// Delete every note in the store
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },
    /// Delete a user by email
    DeleteUser {
        /// Email of the user to delete
        email: String,
    },
    /// Export your notes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
