pub mod snapshots;

pub use snapshots::{OddsSnapshot, SnapshotStore};
