//! Services shared by every front end

mod notes;
mod snapshot;
mod view;

pub use notes::NotesService;
pub use snapshot::{Snapshot, SnapshotBroadcaster, SnapshotSubscription, DEFAULT_CAPACITY};
pub use view::NotesView;
