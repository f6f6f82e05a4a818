//! In-memory adapter for the task record store.

mod store;

pub use store::InMemoryTaskStore;
