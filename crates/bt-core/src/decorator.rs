//! Decorator tasks.
//!
//! Decorators own at most one child and wrap its execution. The single
//! child lives in a [`ChildSlot`], which enforces the degree bound and
//! performs the attach-then-tick handoff shared by every decorator. This
//! module provides [`Inverter`] (NOT logic) and [`AlwaysSucceed`] (error
//! suppression); [`Include`](crate::Include) is a decorator as well.

use crate::{Result, Status, SubtreeResolver, Task, TaskCore, TaskError, TaskId, TaskMetadata};

static INVERTER_METADATA: TaskMetadata = TaskMetadata::decorator(&[]);
static ALWAYS_SUCCEED_METADATA: TaskMetadata = TaskMetadata::decorator(&[]);

/// A task restricted to at most one child.
pub trait Decorator<C>: Task<C> {
    /// The wrapped child, if one is present.
    fn child(&self) -> Option<&dyn Task<C>>;
}

/// Storage for a decorator's single child.
pub struct ChildSlot<C> {
    child: Option<Box<dyn Task<C>>>,
}

impl<C> ChildSlot<C> {
    pub fn empty() -> Self {
        Self { child: None }
    }

    pub fn with(child: Box<dyn Task<C>>) -> Self {
        Self { child: Some(child) }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.child.is_none()
    }

    pub fn get(&self) -> Option<&dyn Task<C>> {
        self.child.as_deref()
    }

    pub fn as_slice(&self) -> &[Box<dyn Task<C>>] {
        self.child.as_slice()
    }

    /// Installs `child`, failing if the slot is already occupied.
    pub fn fill(&mut self, task: &'static str, child: Box<dyn Task<C>>) -> Result<()> {
        if self.child.is_some() {
            return Err(TaskError::TooManyChildren { task, max: 1 });
        }
        self.child = Some(child);
        Ok(())
    }

    /// Attaches the child beneath `parent` and ticks it.
    pub fn tick_beneath(
        &mut self,
        task: &'static str,
        parent: TaskId,
        ctx: &mut C,
        resolver: &dyn SubtreeResolver<C>,
    ) -> Result<Status> {
        let child = self.child.as_mut().ok_or(TaskError::InvalidOperation {
            task,
            reason: "decorator has no child to run",
        })?;
        child.set_control(parent, resolver)?;
        child.tick(ctx, resolver)
    }
}

impl<C> Default for ChildSlot<C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Inverts the result of its child.
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
pub struct Inverter<C> {
    core: TaskCore,
    child: ChildSlot<C>,
}

impl<C> Inverter<C> {
    pub fn new(child: Box<dyn Task<C>>) -> Self {
        Self {
            core: TaskCore::new(),
            child: ChildSlot::with(child),
        }
    }

    fn childless() -> Self {
        Self {
            core: TaskCore::new(),
            child: ChildSlot::empty(),
        }
    }
}

impl<C: 'static> Task<C> for Inverter<C> {
    fn name(&self) -> &'static str {
        "Inverter"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &INVERTER_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        self.child.as_slice()
    }

    fn add_child(&mut self, child: Box<dyn Task<C>>) -> Result<()> {
        self.child.fill("Inverter", child)
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self::childless()))
    }

    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        let id = self.core.id();
        Ok(self.child.tick_beneath("Inverter", id, ctx, resolver)?.invert())
    }
}

impl<C: 'static> Decorator<C> for Inverter<C> {
    fn child(&self) -> Option<&dyn Task<C>> {
        self.child.get()
    }
}

/// Always returns `Success`, regardless of the child's result.
///
/// Useful for optional behaviors that shouldn't cause a sequence to fail.
/// Errors raised by the child still propagate.
pub struct AlwaysSucceed<C> {
    core: TaskCore,
    child: ChildSlot<C>,
}

impl<C> AlwaysSucceed<C> {
    pub fn new(child: Box<dyn Task<C>>) -> Self {
        Self {
            core: TaskCore::new(),
            child: ChildSlot::with(child),
        }
    }

    fn childless() -> Self {
        Self {
            core: TaskCore::new(),
            child: ChildSlot::empty(),
        }
    }
}

impl<C: 'static> Task<C> for AlwaysSucceed<C> {
    fn name(&self) -> &'static str {
        "AlwaysSucceed"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &ALWAYS_SUCCEED_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        self.child.as_slice()
    }

    fn add_child(&mut self, child: Box<dyn Task<C>>) -> Result<()> {
        self.child.fill("AlwaysSucceed", child)
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self::childless()))
    }

    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        let id = self.core.id();
        // Execute child but ignore the result
        let _ = self.child.tick_beneath("AlwaysSucceed", id, ctx, resolver)?;
        Ok(Status::Success)
    }
}

impl<C: 'static> Decorator<C> for AlwaysSucceed<C> {
    fn child(&self) -> Option<&dyn Task<C>> {
        self.child.get()
    }
}
