//! Per-user views over the snapshot stream.

use std::sync::{Arc, PoisonError, RwLock};

use super::notes::NotesService;
use super::snapshot::{Snapshot, SnapshotSubscription};
use crate::error::{Error, Result};
use crate::models::{Note, User};

/// Shared slot holding the active user
pub(crate) type ActiveUserSlot = Arc<RwLock<Option<User>>>;

pub(crate) fn read_active(slot: &ActiveUserSlot) -> Option<User> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

enum Owner {
    /// Whoever is active when a snapshot is evaluated
    Active(ActiveUserSlot),
    /// One explicit user. The cache only holds the active user's notes, so
    /// each snapshot is a cue to read this user's notes from the store.
    Fixed { user: User, service: NotesService },
}

/// Snapshots narrowed down to one user's notes
pub struct NotesView {
    subscription: SnapshotSubscription,
    owner: Owner,
}

impl NotesView {
    pub(crate) const fn active(subscription: SnapshotSubscription, slot: ActiveUserSlot) -> Self {
        Self {
            subscription,
            owner: Owner::Active(slot),
        }
    }

    pub(crate) const fn fixed(
        subscription: SnapshotSubscription,
        user: User,
        service: NotesService,
    ) -> Self {
        Self {
            subscription,
            owner: Owner::Fixed { user, service },
        }
    }

    /// Wait for the next snapshot.
    ///
    /// Yields `Err(Error::NoActiveUser)` for a snapshot evaluated while an
    /// active-user view has nobody to filter for. `None` once the service is gone.
    pub async fn next(&mut self) -> Option<Result<Vec<Note>>> {
        let snapshot = self.subscription.recv().await?;
        Some(self.evaluate(&snapshot).await)
    }

    /// Like [`NotesView::next`] but only if a snapshot is already waiting
    pub async fn try_next(&mut self) -> Option<Result<Vec<Note>>> {
        let snapshot = self.subscription.try_recv()?;
        Some(self.evaluate(&snapshot).await)
    }

    async fn evaluate(&self, snapshot: &Snapshot) -> Result<Vec<Note>> {
        match &self.owner {
            Owner::Active(slot) => {
                let owner_id = read_active(slot).ok_or(Error::NoActiveUser)?.id();
                Ok(snapshot
                    .iter()
                    .filter(|note| note.user_id() == owner_id)
                    .cloned()
                    .collect())
            }
            Owner::Fixed { user, service } => service.stored_notes_for(user).await,
        }
    }
}
