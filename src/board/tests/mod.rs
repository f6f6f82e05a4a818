//! Unit tests for the board module.
