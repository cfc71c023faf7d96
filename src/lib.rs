//! Daylist: a minimal personal task tracker.
//!
//! A signed-in user creates, completes and deletes short text tasks held in a
//! remote collection store. Tasks are shown in three date-derived buckets:
//! today's open tasks, tasks completed today, and tasks completed earlier.
//!
//! # Architecture
//!
//! Daylist follows hexagonal architecture principles:
//!
//! - **Domain**: Task records and the date bucket classifier
//! - **Ports**: The remote store and session boundary contracts
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: The session-gated store adapter and the local state engine
//!
//! # Modules
//!
//! - [`task`]: Task state, classification and remote reconciliation
//! - [`config`]: Layered runtime configuration

pub mod config;
pub mod task;
