//! Exported records for offline evaluation.

pub mod store;

pub use store::{Snapshot, SnapshotStore};
