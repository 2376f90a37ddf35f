//! User and note repositories on top of the raw table operations

use super::connection::LocalStore;
use super::raw::{Filter, Table};
use crate::error::Result;
use crate::models::note::{ID_COLUMN, SYNCED_COLUMN, TEXT_COLUMN, USER_ID_COLUMN};
use crate::models::user::EMAIL_COLUMN;
use crate::models::{normalize_email, Note, RawRow, User};

/// Trait for user storage operations
pub trait UserRepository {
    /// Find a user by email (case-insensitive)
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user and return it
    fn create(&self, email: &str) -> Result<User>;

    /// Delete by email; returns the number of rows removed
    fn delete_by_email(&self, email: &str) -> Result<usize>;
}

/// Trait for note storage operations
pub trait NoteRepository {
    /// Insert an empty, synced note for `user_id`
    fn create(&self, user_id: i64) -> Result<Note>;

    /// Get a note by ID
    fn get(&self, id: i64) -> Result<Option<Note>>;

    /// Every note in the store, in id order
    fn list_all(&self) -> Result<Vec<Note>>;

    /// Notes owned by one user, in id order
    fn list_for_user(&self, user_id: i64) -> Result<Vec<Note>>;

    /// Replace the text and mark the note unsynced; returns the affected count
    fn update_text(&self, id: i64, text: &str) -> Result<usize>;

    /// Delete one note; returns the affected count
    fn delete(&self, id: i64) -> Result<usize>;

    /// Delete every note; returns the affected count
    fn delete_all(&self) -> Result<usize>;
}

/// `UserRepository` backed by the local store
pub struct StoreUserRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> StoreUserRepository<'a> {
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }
}

impl UserRepository for StoreUserRepository<'_> {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let filter = Filter::eq(EMAIL_COLUMN, normalize_email(email));
        let rows = self.store.query(Table::User, Some(&filter))?;
        rows.first()
            .map(User::from_row)
            .transpose()
            .map_err(Into::into)
    }

    fn create(&self, email: &str) -> Result<User> {
        let values = RawRow::new().with(EMAIL_COLUMN, normalize_email(email));
        let id = self.store.insert(Table::User, &values)?;

        Ok(User::from_row(&values.with(ID_COLUMN, id))?)
    }

    fn delete_by_email(&self, email: &str) -> Result<usize> {
        let filter = Filter::eq(EMAIL_COLUMN, normalize_email(email));
        self.store.delete(Table::User, Some(&filter))
    }
}

/// `NoteRepository` backed by the local store
pub struct StoreNoteRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> StoreNoteRepository<'a> {
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    fn decode_all(rows: &[RawRow]) -> Result<Vec<Note>> {
        rows.iter()
            .map(|row| Note::from_row(row).map_err(Into::into))
            .collect()
    }
}

impl NoteRepository for StoreNoteRepository<'_> {
    fn create(&self, user_id: i64) -> Result<Note> {
        let values = RawRow::new()
            .with(USER_ID_COLUMN, user_id)
            .with(TEXT_COLUMN, String::new())
            .with(SYNCED_COLUMN, 1_i64);
        let id = self.store.insert(Table::Note, &values)?;

        Ok(Note::from_row(&values.with(ID_COLUMN, id))?)
    }

    fn get(&self, id: i64) -> Result<Option<Note>> {
        let filter = Filter::eq(ID_COLUMN, id);
        let rows = self.store.query(Table::Note, Some(&filter))?;
        rows.first()
            .map(Note::from_row)
            .transpose()
            .map_err(Into::into)
    }

    fn list_all(&self) -> Result<Vec<Note>> {
        Self::decode_all(&self.store.query(Table::Note, None)?)
    }

    fn list_for_user(&self, user_id: i64) -> Result<Vec<Note>> {
        let filter = Filter::eq(USER_ID_COLUMN, user_id);
        Self::decode_all(&self.store.query(Table::Note, Some(&filter))?)
    }

    fn update_text(&self, id: i64, text: &str) -> Result<usize> {
        let values = RawRow::new()
            .with(TEXT_COLUMN, text.to_string())
            .with(SYNCED_COLUMN, 0_i64);
        self.store
            .update(Table::Note, &values, &Filter::eq(ID_COLUMN, id))
    }

    fn delete(&self, id: i64) -> Result<usize> {
        self.store
            .delete(Table::Note, Some(&Filter::eq(ID_COLUMN, id)))
    }

    fn delete_all(&self) -> Result<usize> {
        self.store.delete(Table::Note, None)
    }
}
