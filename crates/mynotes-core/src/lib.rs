//! mynotes-core - Core library for mynotes
//!
//! This crate contains the entities, the local SQLite store, and the notes
//! service that front ends drive: user lookup and creation, per-user note CRUD,
//! an in-memory cache of the active user's notes, and a snapshot stream that
//! pushes the cache to subscribers after every change.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod util;

pub use auth::{AuthUser, IdentityProvider, InMemoryIdentityProvider};
pub use config::{StoreConfig, StoreLocation};
pub use error::{Error, Result};
pub use models::{DecodeError, Note, RawRow, User};
pub use services::{NotesService, NotesView};
