//! Pure planning logic for the compact task-number namespace.
//!
//! The holder set is always recomputed from an authoritative snapshot
//! rather than cached, so planning stays correct under concurrent callers
//! as long as the adapter applies the plan inside one transaction. The
//! batch plan performs all displacements of existing holders first, against
//! a fully reserved target set, before any new number is chosen; this keeps
//! every conflict resolved exactly once, with no reassignment cascades.

use super::{TaskDomainError, TaskDraft, TaskId, TaskNumber, TaskSummary};
use std::collections::BTreeSet;

/// A draft paired with the explicit number its import line requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberRequest {
    draft: TaskDraft,
    requested: Option<TaskNumber>,
}

impl NumberRequest {
    /// Pairs a draft with an optional requested number.
    #[must_use]
    pub const fn new(draft: TaskDraft, requested: Option<TaskNumber>) -> Self {
        Self { draft, requested }
    }

    /// Returns the draft to insert.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Returns the requested number, if the line carried one.
    #[must_use]
    pub const fn requested(&self) -> Option<TaskNumber> {
        self.requested
    }

    /// Consumes the request, yielding the draft.
    #[must_use]
    pub fn into_draft(self) -> TaskDraft {
        self.draft
    }
}

/// A planned displacement of an existing holder to a safe free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    /// Existing task to renumber.
    pub task: TaskId,
    /// Slot it moves to, outside the reserved set.
    pub new_number: TaskNumber,
}

/// Result of planning a bulk allocation: displacements to persist before
/// any insertion, and one assigned number per incoming candidate in batch
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    reassignments: Vec<Reassignment>,
    assignments: Vec<TaskNumber>,
}

impl AllocationPlan {
    /// Returns the displacements of existing holders, in snapshot order.
    #[must_use]
    pub fn reassignments(&self) -> &[Reassignment] {
        &self.reassignments
    }

    /// Returns the assigned number for each candidate, in batch order.
    #[must_use]
    pub fn assignments(&self) -> &[TaskNumber] {
        &self.assignments
    }
}

/// Returns the smallest positive number absent from `reserved`.
///
/// # Errors
///
/// Returns [`TaskDomainError::NumberSpaceExhausted`] when every number up
/// to the schema maximum is reserved.
pub fn first_free(reserved: &BTreeSet<TaskNumber>) -> Result<TaskNumber, TaskDomainError> {
    let mut candidate: u32 = 1;
    for held in reserved {
        if held.value() == candidate {
            candidate = candidate
                .checked_add(1)
                .ok_or(TaskDomainError::NumberSpaceExhausted)?;
        } else if held.value() > candidate {
            break;
        }
    }
    TaskNumber::new(candidate).map_err(|_| TaskDomainError::NumberSpaceExhausted)
}

/// Plans a bulk allocation over the active snapshot.
///
/// Phase 1 (reservation): existing holders of any requested number are
/// displaced to the smallest number outside the reserved set (held numbers
/// plus every requested number), each chosen slot joining the reserved set
/// immediately so two displaced tasks never land on the same number.
///
/// Phase 2 (assignment): candidates receive their explicit number as-is
/// (phase 1 freed it), or the smallest number still outside the reserved
/// set. An explicit number repeated within the batch is honoured only for
/// its first occurrence; later repeats fall back to a fresh slot.
///
/// # Errors
///
/// Returns [`TaskDomainError::NumberSpaceExhausted`] when the namespace
/// has no free slot below the schema maximum.
pub fn plan_batch(
    active: &[TaskSummary],
    requested: &[Option<TaskNumber>],
) -> Result<AllocationPlan, TaskDomainError> {
    let requested_set: BTreeSet<TaskNumber> = requested.iter().flatten().copied().collect();
    let held: BTreeSet<TaskNumber> = active.iter().filter_map(|summary| summary.number).collect();

    // Reserved = held ∪ requested, growing as replacement slots are chosen.
    let mut reserved: BTreeSet<TaskNumber> = held.union(&requested_set).copied().collect();
    let mut reassignments = Vec::new();
    for summary in active {
        if let Some(number) = summary.number
            && requested_set.contains(&number)
        {
            let replacement = first_free(&reserved)?;
            reserved.insert(replacement);
            reassignments.push(Reassignment {
                task: summary.id,
                new_number: replacement,
            });
        }
    }

    let mut assignments = Vec::with_capacity(requested.len());
    let mut granted: BTreeSet<TaskNumber> = BTreeSet::new();
    for request in requested {
        let number = match request {
            Some(explicit) if !granted.contains(explicit) => *explicit,
            _ => {
                let fresh = first_free(&reserved)?;
                reserved.insert(fresh);
                fresh
            }
        };
        granted.insert(number);
        assignments.push(number);
    }

    Ok(AllocationPlan {
        reassignments,
        assignments,
    })
}
