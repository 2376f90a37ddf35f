//! The notes service: store, note cache, and snapshot stream behind one handle.

use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, MutexGuard};

use super::snapshot::{SnapshotBroadcaster, SnapshotSubscription};
use super::view::{read_active, ActiveUserSlot, NotesView};
use crate::auth::IdentityProvider;
use crate::config::StoreConfig;
use crate::db::{
    LocalStore, NoteRepository, StoreNoteRepository, StoreUserRepository, UserRepository,
};
use crate::error::{Error, Result};
use crate::models::{normalize_email, Note, User};

struct ServiceState {
    store: LocalStore,
    /// Notes of the active user, in id order
    cache: Vec<Note>,
}

/// Thread-safe service for user and note operations.
///
/// Cloning yields another handle to the same store, cache and stream. All
/// storage work is serialised through one lock around the connection.
#[derive(Clone)]
pub struct NotesService {
    state: Arc<Mutex<ServiceState>>,
    active_user: ActiveUserSlot,
    snapshots: Arc<SnapshotBroadcaster>,
}

impl NotesService {
    /// Create a service for the given store location. Nothing is opened yet.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServiceState {
                store: LocalStore::new(config),
                cache: Vec::new(),
            })),
            active_user: ActiveUserSlot::default(),
            snapshots: Arc::new(SnapshotBroadcaster::default()),
        }
    }

    /// Service over a private in-memory database (primarily for tests).
    pub fn in_memory() -> Self {
        Self::new(StoreConfig::in_memory())
    }

    /// Open the store and load the cache
    pub async fn open(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.store.open()?;
        self.reload_cache(&mut state)
    }

    /// Close the store and drop the cache
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.store.close()?;
        state.cache.clear();
        self.publish(&state);
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.store.is_open()
    }

    /// Look a user up by email, creating it when missing.
    ///
    /// With `set_active`, the user becomes the active user and the cache is
    /// reloaded for them.
    pub async fn get_or_create_user(&self, email: &str, set_active: bool) -> Result<User> {
        let mut state = self.open_state().await?;
        let user = match Self::find_user(&state, email) {
            Ok(user) => user,
            Err(Error::UserNotFound(_)) => Self::insert_user(&state, email)?,
            Err(error) => return Err(error),
        };

        if set_active {
            self.activate(&mut state, user.clone())?;
        }
        Ok(user)
    }

    pub async fn create_user(&self, email: &str) -> Result<User> {
        let state = self.open_state().await?;
        Self::insert_user(&state, email)
    }

    pub async fn get_user(&self, email: &str) -> Result<User> {
        let state = self.open_state().await?;
        Self::find_user(&state, email)
    }

    /// Delete a user by email.
    ///
    /// Deleting the active user also clears the active user and the cache.
    pub async fn delete_user(&self, email: &str) -> Result<()> {
        let mut state = self.open_state().await?;
        let deleted = StoreUserRepository::new(&state.store).delete_by_email(email)?;
        if deleted == 0 {
            return Err(Error::DeleteFailed(format!("user {}", normalize_email(email))));
        }
        tracing::debug!("Deleted user {}", normalize_email(email));

        let was_active = self
            .active_user()
            .is_some_and(|user| user.email() == normalize_email(email));
        if was_active {
            self.set_active_slot(None);
            state.cache.clear();
            self.publish(&state);
        }
        Ok(())
    }

    /// Create an empty note for `owner`.
    ///
    /// The owner is looked up again by email and must still be the same user;
    /// a stale `User` value fails with `UserNotFound`.
    pub async fn create_note(&self, owner: &User) -> Result<Note> {
        let mut state = self.open_state().await?;
        let stored = Self::find_user(&state, owner.email())?;
        if stored != *owner {
            return Err(Error::UserNotFound(owner.email().to_string()));
        }

        let note = StoreNoteRepository::new(&state.store).create(owner.id())?;
        tracing::debug!("Created note {} for user {}", note.id(), owner.id());

        if self.is_active_owner(&note) {
            state.cache.push(note.clone());
        }
        self.publish(&state);
        Ok(note)
    }

    /// Fetch a note and refresh its cache entry
    pub async fn get_note(&self, id: i64) -> Result<Note> {
        let mut state = self.open_state().await?;
        let note = StoreNoteRepository::new(&state.store)
            .get(id)?
            .ok_or(Error::NoteNotFound(id))?;

        self.upsert_cached(&mut state, &note);
        self.publish(&state);
        Ok(note)
    }

    /// Every stored note regardless of owner. Does not touch the cache.
    pub async fn get_all_notes(&self) -> Result<Vec<Note>> {
        let state = self.open_state().await?;
        StoreNoteRepository::new(&state.store).list_all()
    }

    /// Replace a note's text, marking it as not synced with the cloud.
    ///
    /// Fails with `UpdateFailed` when the note no longer exists.
    pub async fn update_note(&self, note: &Note, text: &str) -> Result<Note> {
        let mut state = self.open_state().await?;
        let repo = StoreNoteRepository::new(&state.store);
        if repo.get(note.id())?.is_none() {
            return Err(Error::UpdateFailed(note.id()));
        }

        if repo.update_text(note.id(), text)? == 0 {
            return Err(Error::UpdateFailed(note.id()));
        }
        let updated = repo.get(note.id())?.ok_or(Error::NoteNotFound(note.id()))?;
        tracing::debug!("Updated note {}", updated.id());

        self.upsert_cached(&mut state, &updated);
        self.publish(&state);
        Ok(updated)
    }

    pub async fn delete_note(&self, id: i64) -> Result<()> {
        let mut state = self.open_state().await?;
        let deleted = StoreNoteRepository::new(&state.store).delete(id)?;
        if deleted == 0 {
            return Err(Error::DeleteFailed(format!("note {id}")));
        }
        tracing::debug!("Deleted note {id}");

        state.cache.retain(|cached| cached.id() != id);
        self.publish(&state);
        Ok(())
    }

    /// Delete every note of every user; returns how many were removed
    pub async fn delete_all_notes(&self) -> Result<usize> {
        let mut state = self.open_state().await?;
        let deleted = StoreNoteRepository::new(&state.store).delete_all()?;
        tracing::debug!("Deleted all {deleted} notes");

        state.cache.clear();
        self.publish(&state);
        Ok(deleted)
    }

    /// Snapshots filtered to whoever is active when each one is read
    pub fn all_notes(&self) -> NotesView {
        NotesView::active(self.snapshots.subscribe(), Arc::clone(&self.active_user))
    }

    /// The stored notes of one explicit user, re-read on every snapshot.
    ///
    /// Works whether or not `user` is active. A closed store reads as empty.
    pub fn notes_for(&self, user: &User) -> NotesView {
        NotesView::fixed(self.snapshots.subscribe(), user.clone(), self.clone())
    }

    /// Unfiltered snapshots of the cache
    pub fn subscribe(&self) -> SnapshotSubscription {
        self.snapshots.subscribe()
    }

    pub fn active_user(&self) -> Option<User> {
        read_active(&self.active_user)
    }

    /// Forget the active user and empty the cache
    pub async fn clear_active_user(&self) {
        let mut state = self.state.lock().await;
        self.set_active_slot(None);
        state.cache.clear();
        self.publish(&state);
    }

    /// Current contents of the note cache
    pub async fn cached_notes(&self) -> Vec<Note> {
        self.state.lock().await.cache.clone()
    }

    /// Make the provider's signed-in user the active user, creating it locally if new
    pub async fn sign_in<P: IdentityProvider + Sync>(&self, provider: &P) -> Result<User> {
        let auth_user = provider
            .current_user()
            .await?
            .ok_or(Error::NotAuthenticated)?;
        if auth_user.email.trim().is_empty() {
            return Err(Error::Auth("provider returned a user without an email".to_string()));
        }
        self.get_or_create_user(&auth_user.email, true).await
    }

    /// Log out of the provider and clear the active user
    pub async fn sign_out<P: IdentityProvider + Sync>(&self, provider: &P) -> Result<()> {
        provider.logout().await?;
        self.clear_active_user().await;
        Ok(())
    }

    pub(crate) async fn stored_notes_for(&self, user: &User) -> Result<Vec<Note>> {
        let state = self.state.lock().await;
        if !state.store.is_open() {
            return Ok(Vec::new());
        }
        StoreNoteRepository::new(&state.store).list_for_user(user.id())
    }

    /// Lock the state, opening the store first if needed.
    ///
    /// Opening here loads the cache just like an explicit `open`.
    async fn open_state(&self) -> Result<MutexGuard<'_, ServiceState>> {
        let mut state = self.state.lock().await;
        if state.store.ensure_open()? {
            self.reload_cache(&mut state)?;
        }
        Ok(state)
    }

    fn find_user(state: &ServiceState, email: &str) -> Result<User> {
        StoreUserRepository::new(&state.store)
            .find_by_email(email)?
            .ok_or_else(|| Error::UserNotFound(normalize_email(email)))
    }

    fn insert_user(state: &ServiceState, email: &str) -> Result<User> {
        let repo = StoreUserRepository::new(&state.store);
        if repo.find_by_email(email)?.is_some() {
            return Err(Error::UserAlreadyExists(normalize_email(email)));
        }

        let user = repo.create(email)?;
        tracing::debug!("Created user {} ({})", user.id(), user.email());
        Ok(user)
    }

    fn activate(&self, state: &mut ServiceState, user: User) -> Result<()> {
        tracing::info!("Active user is now {}", user.email());
        self.set_active_slot(Some(user));
        self.reload_cache(state)
    }

    fn reload_cache(&self, state: &mut ServiceState) -> Result<()> {
        state.cache = match self.active_user() {
            Some(user) => StoreNoteRepository::new(&state.store).list_for_user(user.id())?,
            None => Vec::new(),
        };
        tracing::debug!("Loaded {} notes into cache", state.cache.len());
        self.publish(state);
        Ok(())
    }

    fn upsert_cached(&self, state: &mut ServiceState, note: &Note) {
        if !self.is_active_owner(note) {
            return;
        }
        match state.cache.iter_mut().find(|cached| cached.id() == note.id()) {
            Some(cached) => *cached = note.clone(),
            None => {
                state.cache.push(note.clone());
                state.cache.sort_by_key(Note::id);
            }
        }
    }

    fn is_active_owner(&self, note: &Note) -> bool {
        self.active_user()
            .is_some_and(|user| user.id() == note.user_id())
    }

    fn set_active_slot(&self, user: Option<User>) {
        *self
            .active_user
            .write()
            .unwrap_or_else(PoisonError::into_inner) = user;
    }

    fn publish(&self, state: &ServiceState) {
        self.snapshots.publish(state.cache.clone());
    }
}
