//! Core task trait.
//!
//! This module defines the [`Task`] trait, the fundamental abstraction for
//! every node in a behavior tree, along with the per-instance state
//! ([`TaskCore`]) that all node types embed. The trait is generic over a
//! context type `C`, the blackboard that tasks read and modify while ticking.
//!
//! # Cloning
//!
//! Trees are templates: each agent receives its own deep copy built by
//! [`Task::clone_task`]. The default implementation runs the type's own copy
//! step ([`Task::copy_fields`]) and then clones every child recursively, so
//! a clone never shares a mutable node with its source. Types with special
//! instantiation rules (see [`Include`](crate::Include)) override the whole
//! operation.
//!
//! # Control
//!
//! A task's parent is recorded as a [`TaskId`] handle, never as an owning
//! pointer. Ownership only flows downward through `children`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Result, Status, SubtreeResolver, TaskError, TaskMetadata};

/// Opaque handle identifying one task instance.
///
/// Handles are unique per process; a clone always receives a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value of this handle.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity and control state embedded in every task instance.
///
/// Deliberately not `Clone`: copying a task must mint a new identity.
#[derive(Debug)]
pub struct TaskCore {
    id: TaskId,
    control: Option<TaskId>,
}

impl TaskCore {
    pub fn new() -> Self {
        Self {
            id: TaskId::next(),
            control: None,
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn control(&self) -> Option<TaskId> {
        self.control
    }

    /// Records `parent` as this task's control.
    ///
    /// Attaching again to the same parent is a no-op; a task never moves to
    /// a different parent once attached.
    pub(crate) fn attach(&mut self, task: &'static str, parent: TaskId) -> Result<()> {
        match self.control {
            None => {
                self.control = Some(parent);
                Ok(())
            }
            Some(current) if current == parent => Ok(()),
            Some(current) => Err(TaskError::AlreadyAttached {
                task,
                id: self.id,
                current,
                requested: parent,
            }),
        }
    }
}

impl Default for TaskCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A behavior tree node.
pub trait Task<C>: Send + Sync {
    /// Type name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Static descriptor of this task type.
    fn metadata(&self) -> &'static TaskMetadata;

    fn core(&self) -> &TaskCore;

    fn core_mut(&mut self) -> &mut TaskCore;

    /// Owned children in authoring order.
    fn children(&self) -> &[Box<dyn Task<C>>];

    /// Appends a child, failing if the type is at capacity.
    fn add_child(&mut self, child: Box<dyn Task<C>>) -> Result<()>;

    /// Copies this task's configuration into a new, childless instance.
    ///
    /// This is the per-type step of [`clone_task`](Task::clone_task); it
    /// never copies children.
    fn copy_fields(&self) -> Result<Box<dyn Task<C>>>;

    /// Produces an independent deep copy of the subtree rooted here.
    ///
    /// `resolver` is handed down so that tasks grafting external subtrees
    /// can instantiate them while the tree is being cloned.
    fn clone_task(&self, resolver: &dyn SubtreeResolver<C>) -> Result<Box<dyn Task<C>>> {
        let mut copy = self.copy_fields()?;
        for child in self.children() {
            copy.add_child(child.clone_task(resolver)?)?;
        }
        Ok(copy)
    }

    /// Attaches this task beneath `control`.
    ///
    /// This is the only way to give a task a parent from outside the crate.
    fn set_control(&mut self, control: TaskId, _resolver: &dyn SubtreeResolver<C>) -> Result<()> {
        let name = self.name();
        self.core_mut().attach(name, control)
    }

    /// Evaluates this task against the context.
    ///
    /// Parents attach a child with [`set_control`](Task::set_control) before
    /// ticking it.
    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status>;

    #[inline]
    fn id(&self) -> TaskId {
        self.core().id()
    }

    #[inline]
    fn control(&self) -> Option<TaskId> {
        self.core().control()
    }

    #[inline]
    fn child_count(&self) -> usize {
        self.children().len()
    }
}

/// Visits `root` and all of its descendants depth-first, pre-order.
///
/// The callback receives each task and its depth below `root`.
pub fn walk<C>(root: &dyn Task<C>, visit: &mut dyn FnMut(&dyn Task<C>, usize)) {
    fn go<C>(task: &dyn Task<C>, depth: usize, visit: &mut dyn FnMut(&dyn Task<C>, usize)) {
        visit(task, depth);
        for child in task.children() {
            go(child.as_ref(), depth + 1, visit);
        }
    }
    go(root, 0, visit);
}
