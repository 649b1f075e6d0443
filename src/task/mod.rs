//! Task lifecycle and number allocation for Tablon.
//!
//! This module owns the task aggregate and the invariant that every
//! non-archived task holds a unique positive `TaskNumber`, minimally packed
//! from 1 upward. Numbers are allocated on creation, reserved and reconciled
//! during bulk import, released unconditionally on archival (including
//! soft-delete and the lazy archive sweep), and reassigned on un-archival.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
