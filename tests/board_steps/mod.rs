//! Step definitions for board workflow scenarios.

pub mod given;
pub mod then;
pub mod when;
