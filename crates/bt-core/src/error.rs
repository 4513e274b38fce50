//! Error types raised while cloning, attaching, or ticking tasks.

use thiserror::Error;

use crate::TaskId;

/// Errors surfaced by task composition and subtree inclusion.
///
/// None of these are recovered inside the crate: a failed clone yields no
/// tree and a failed attach or tick aborts the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The operation is illegal for this task in its current mode, e.g. an
    /// eager `Include` attached to a running parent.
    #[error("invalid operation on {task}: {reason}")]
    InvalidOperation {
        task: &'static str,
        reason: &'static str,
    },

    /// A task reached the plain field-copy step it must never go through.
    #[error("{task} cannot be copied: {reason}")]
    CloneError {
        task: &'static str,
        reason: &'static str,
    },

    /// The subtree resolver could not produce a tree for this reference.
    #[error("subtree reference {reference:?} could not be resolved")]
    UnresolvedReference { reference: String },

    #[error("{task} {id} is already controlled by {current}, cannot attach to {requested}")]
    AlreadyAttached {
        task: &'static str,
        id: TaskId,
        current: TaskId,
        requested: TaskId,
    },

    #[error("{task} accepts at most {max} child task(s)")]
    TooManyChildren { task: &'static str, max: usize },

    /// Inclusion nested deeper than the configured limit, usually an
    /// archetype that includes itself.
    #[error("inclusion of {reference:?} exceeded the maximum depth of {limit}")]
    IncludeDepthExceeded { reference: String, limit: usize },
}

impl TaskError {
    pub(crate) fn unresolved(reference: impl Into<String>) -> Self {
        TaskError::UnresolvedReference {
            reference: reference.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
