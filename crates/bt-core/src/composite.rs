//! Composite tasks.
//!
//! Composite tasks control the execution flow of multiple children. This
//! module provides the two fundamental building blocks: [`Sequence`] (AND
//! logic) and [`Selector`] (OR logic).
//!
//! A composite attaches each child beneath itself right before ticking it.
//! That attach is where lazily included subtrees materialize, so a branch
//! that is never reached never resolves its subtree.

use crate::{Result, Status, SubtreeResolver, Task, TaskCore, TaskMetadata};

static SEQUENCE_METADATA: TaskMetadata = TaskMetadata::composite(&[]);
static SELECTOR_METADATA: TaskMetadata = TaskMetadata::composite(&[]);

/// Attaches and ticks children in order until one returns `stop_on`.
fn tick_children<C>(
    parent: &TaskCore,
    children: &mut [Box<dyn Task<C>>],
    stop_on: Status,
    ctx: &mut C,
    resolver: &dyn SubtreeResolver<C>,
) -> Result<Option<Status>> {
    for child in children {
        child.set_control(parent.id(), resolver)?;
        let status = child.tick(ctx, resolver)?;
        if status == stop_on {
            return Ok(Some(status));
        }
    }
    Ok(None)
}

/// Executes children in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<C> {
    core: TaskCore,
    children: Vec<Box<dyn Task<C>>>,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given children.
    pub fn new(children: Vec<Box<dyn Task<C>>>) -> Self {
        Self {
            core: TaskCore::new(),
            children,
        }
    }
}

impl<C: 'static> Task<C> for Sequence<C> {
    fn name(&self) -> &'static str {
        "Sequence"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &SEQUENCE_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn Task<C>>) -> Result<()> {
        self.children.push(child);
        Ok(())
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self::new(Vec::new())))
    }

    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        let failed = tick_children(
            &self.core,
            &mut self.children,
            Status::Failure,
            ctx,
            resolver,
        )?;
        Ok(failed.unwrap_or(Status::Success))
    }
}

/// Executes children in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<C> {
    core: TaskCore,
    children: Vec<Box<dyn Task<C>>>,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given children.
    pub fn new(children: Vec<Box<dyn Task<C>>>) -> Self {
        Self {
            core: TaskCore::new(),
            children,
        }
    }
}

impl<C: 'static> Task<C> for Selector<C> {
    fn name(&self) -> &'static str {
        "Selector"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &SELECTOR_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn Task<C>>) -> Result<()> {
        self.children.push(child);
        Ok(())
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self::new(Vec::new())))
    }

    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        let succeeded = tick_children(
            &self.core,
            &mut self.children,
            Status::Success,
            ctx,
            resolver,
        )?;
        Ok(succeeded.unwrap_or(Status::Failure))
    }
}
