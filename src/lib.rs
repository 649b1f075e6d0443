//! Tablon: multi-tenant task tracker core.
//!
//! This crate provides the bulk task-import pipeline for a small task
//! tracker: free-text parsing of pasted task lists, AI-assisted duplicate
//! detection against the active task set, and a compact, gap-filling
//! task-number allocation scheme that stays unique across non-archived
//! tasks while numbers are released and reused as tasks are archived.
//!
//! # Architecture
//!
//! Tablon follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, number allocation, and lifecycle tracking
//! - [`import`]: Pasted-text parsing, duplicate detection, and batch import

pub mod import;
pub mod task;
