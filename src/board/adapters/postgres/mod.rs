//! `PostgreSQL` adapter for the task record store.

pub(crate) mod models;
pub(crate) mod schema;
pub(crate) mod store;

pub use store::{BoardPgPool, PostgresTaskStore};
