//! Orchestration services for task lifecycle and the archive sweep.

mod archive;
mod lifecycle;

pub use archive::ArchiveSweepService;
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
