//! Application services for board mutation and resynchronisation.

mod coordinator;
mod error;
mod snapshot;

pub use coordinator::{BoardService, Mutation, MutationReceipt, SyncedMutation};
pub use error::{BoardError, BoardResult};
pub use snapshot::{BoardSnapshot, SnapshotCache};
