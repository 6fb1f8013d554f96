//! Persistence module: record types and the snapshot-backed store.
//!
//! Layout:
//! - `models.rs`: lists, items, users and the on-disk snapshot shape
//! - `snapshot.rs`: JSON read/write of the single snapshot file
//! - `store.rs`: the lock-guarded in-memory store

pub mod models;
pub mod snapshot;
pub mod store;

pub use models::{ItemId, ListId, Role, Snapshot, TodoItem, TodoList, User, UserId};
pub use store::TodoStore;
