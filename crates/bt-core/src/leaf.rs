//! Leaf tasks backed by closures.
//!
//! The closures are configuration, not state: clones share them through an
//! `Arc`. Leaves that need per-agent mutable state implement [`Task`]
//! directly and copy that state in [`Task::copy_fields`].

use std::sync::Arc;

use crate::{Result, Status, SubtreeResolver, Task, TaskCore, TaskError, TaskMetadata};

static ACTION_METADATA: TaskMetadata = TaskMetadata::leaf(&[]);
static CONDITION_METADATA: TaskMetadata = TaskMetadata::leaf(&[]);

type ActionFn<C> = Arc<dyn Fn(&mut C) -> Status + Send + Sync>;
type PredicateFn<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

/// Runs a closure against the context and reports its status.
pub struct Action<C> {
    core: TaskCore,
    run: ActionFn<C>,
}

impl<C> Action<C> {
    pub fn new(run: impl Fn(&mut C) -> Status + Send + Sync + 'static) -> Self {
        Self {
            core: TaskCore::new(),
            run: Arc::new(run),
        }
    }
}

impl<C: 'static> Task<C> for Action<C> {
    fn name(&self) -> &'static str {
        "Action"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &ACTION_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        &[]
    }

    fn add_child(&mut self, _child: Box<dyn Task<C>>) -> Result<()> {
        Err(TaskError::TooManyChildren {
            task: "Action",
            max: 0,
        })
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self {
            core: TaskCore::new(),
            run: Arc::clone(&self.run),
        }))
    }

    fn tick(&mut self, ctx: &mut C, _resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        Ok((self.run)(ctx))
    }
}

/// Succeeds when the predicate holds for the context.
pub struct Condition<C> {
    core: TaskCore,
    predicate: PredicateFn<C>,
}

impl<C> Condition<C> {
    pub fn new(predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        Self {
            core: TaskCore::new(),
            predicate: Arc::new(predicate),
        }
    }
}

impl<C: 'static> Task<C> for Condition<C> {
    fn name(&self) -> &'static str {
        "Condition"
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &CONDITION_METADATA
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    fn children(&self) -> &[Box<dyn Task<C>>] {
        &[]
    }

    fn add_child(&mut self, _child: Box<dyn Task<C>>) -> Result<()> {
        Err(TaskError::TooManyChildren {
            task: "Condition",
            max: 0,
        })
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        Ok(Box::new(Self {
            core: TaskCore::new(),
            predicate: Arc::clone(&self.predicate),
        }))
    }

    fn tick(&mut self, ctx: &mut C, _resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        Ok(Status::from((self.predicate)(ctx)))
    }
}
