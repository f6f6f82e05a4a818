//! Board state engine.
//!
//! Derives the three-column board from a flat task list, resolves stage
//! transitions, and sequences task mutations against the task record store
//! followed by a full resynchronisation. The module follows hexagonal
//! architecture:
//!
//! - Domain types, the board projection and the transition engine in
//!   [`domain`]
//! - The task record store contract in [`ports`]
//! - Store implementations in [`adapters`]
//! - The mutation coordinator and snapshot cache in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
