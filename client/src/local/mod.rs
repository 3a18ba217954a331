//! Offline mode: a single JSON document on disk, keyed by guild name.
//!
//! Independent of the networked path; nothing here talks to the API.

pub mod document;
pub mod store;

pub use document::{Document, GuildRecord, LocalLog};
pub use store::LocalStore;
