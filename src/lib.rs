//! Taskboard: board state engine for a three-stage task tracker.
//!
//! Tasks move across the fixed stages `todo`, `inprogress` and `done`. This
//! crate decides how they are ordered, filtered and transitioned, and keeps
//! the displayed board consistent with the task record store by reloading it
//! in full after every mutation.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the task record store
//! - **Adapters**: Concrete store implementations (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`board`]: Projection, transitions and the mutation coordinator
//! - [`config`]: Environment-driven runtime configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod config;
pub mod telemetry;
