//! Bulk task import for Tablon.
//!
//! Pasted free-text task lists are parsed into structured candidates,
//! annotated with duplicate verdicts by an external classifier that is
//! allowed to be absent or misbehaving, and inserted through the task
//! module's number reconciliation. Classification always completes before
//! the allocation transaction opens, so a slow classifier never holds the
//! number lock. The module follows hexagonal architecture:
//!
//! - Domain types and the line parser in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
