//! Per-agent behavior tree instances.

use std::sync::Arc;

use crate::{Result, Status, SubtreeResolver, Task, TaskCore, TaskId};

/// An instantiated tree owned by one agent.
///
/// The tree is the control of its root: stepping attaches the root beneath
/// the tree before ticking it, so a lazily included root resolves on the
/// first step like any other lazy `Include`. The resolver is kept for that
/// purpose and for [`try_clone`](BehaviorTree::try_clone).
pub struct BehaviorTree<C> {
    core: TaskCore,
    root: Box<dyn Task<C>>,
    resolver: Arc<dyn SubtreeResolver<C>>,
}

impl<C: 'static> BehaviorTree<C> {
    /// Wraps an already instantiated root.
    pub fn new(root: Box<dyn Task<C>>, resolver: Arc<dyn SubtreeResolver<C>>) -> Self {
        Self {
            core: TaskCore::new(),
            root,
            resolver,
        }
    }

    /// Clones `template` into a new tree, grafting eager subtrees.
    pub fn instantiate(
        template: &dyn Task<C>,
        resolver: Arc<dyn SubtreeResolver<C>>,
    ) -> Result<Self> {
        let root = template.clone_task(resolver.as_ref())?;
        Ok(Self::new(root, resolver))
    }

    /// Clones this tree for another agent.
    ///
    /// Lazy subtrees already resolved here start unresolved in the copy.
    pub fn try_clone(&self) -> Result<Self> {
        Self::instantiate(self.root.as_ref(), Arc::clone(&self.resolver))
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.core.id()
    }

    pub fn root(&self) -> &dyn Task<C> {
        self.root.as_ref()
    }

    /// Attaches the root and ticks it once against `ctx`.
    pub fn step(&mut self, ctx: &mut C) -> Result<Status> {
        let resolver = self.resolver.as_ref();
        self.root.set_control(self.core.id(), resolver)?;
        self.root.tick(ctx, resolver)
    }
}
