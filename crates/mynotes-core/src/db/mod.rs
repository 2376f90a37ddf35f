//! Local store for mynotes

mod connection;
mod raw;
mod repository;
mod schema;

pub use connection::LocalStore;
pub use raw::{Filter, Table};
pub use repository::{NoteRepository, StoreNoteRepository, StoreUserRepository, UserRepository};
pub use schema::{NOTE_TABLE, USER_TABLE};
