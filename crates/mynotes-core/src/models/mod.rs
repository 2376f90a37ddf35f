//! Data models for mynotes

pub(crate) mod note;
mod row;
pub(crate) mod user;

pub use note::Note;
pub use row::{DecodeError, RawRow};
pub use user::{normalize_email, User};
