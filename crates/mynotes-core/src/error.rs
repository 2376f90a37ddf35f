//! Error types for mynotes-core

use thiserror::Error;

use crate::models::DecodeError;

/// Result type alias using mynotes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mynotes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `open()` was called while a connection is already held
    #[error("Database is already open")]
    AlreadyOpen,

    /// `close()` was called without an open connection
    #[error("Database is not open")]
    NotOpen,

    /// The storage directory could not be resolved or created
    #[error("Unable to get documents directory: {0}")]
    DirectoryUnavailable(String),

    /// No user with the given email
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A user with the given email already exists
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// No note with the given id
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// An update touched zero rows
    #[error("Could not update note: {0}")]
    UpdateFailed(i64),

    /// A delete touched zero rows
    #[error("Could not delete {0}")]
    DeleteFailed(String),

    /// The filtered note view was evaluated with no active user
    #[error("No active user")]
    NoActiveUser,

    /// The identity provider has no signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// Identity provider failure
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// A row did not match the expected columns
    #[error("Row decode error: {0}")]
    Decode(#[from] DecodeError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
