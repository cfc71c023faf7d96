//! Personal task tracking.
//!
//! A signed-in user creates, completes and deletes short text tasks that live
//! in a remote collection store. The module follows hexagonal architecture:
//!
//! - Domain types and the date bucket classifier in [`domain`]
//! - Port contracts for the remote store and session boundary in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The store adapter and local state engine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
