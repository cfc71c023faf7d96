//! Adapter implementations for task tracker ports.

pub mod memory;
pub mod postgres;
