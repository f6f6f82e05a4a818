//! Adapter implementations for the task record store port.

pub mod memory;
pub mod postgres;
