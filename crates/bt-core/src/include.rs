//! Subtree inclusion.
//!
//! An [`Include`] is a decorator whose child is not authored inline but
//! produced by a [`SubtreeResolver`] from a reference string. When the
//! subtree is grafted depends on the [`Inclusion`] mode:
//!
//! - **Eager**: at clone time. Cloning an eager `Include` returns the
//!   resolved subtree root in its place, so an instantiated tree never
//!   contains one. Attaching or copying an eager `Include` is an error.
//! - **Lazy**: at run time. The `Include` survives cloning with its child
//!   unresolved and resolves it the first time it is attached to a parent,
//!   once per instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use bt_core::{Include, Selector, Task};
//!
//! let template: Selector<Blackboard> = Selector::new(vec![
//!     Box::new(Include::with_subtree("combat/melee")),
//!     Box::new(Include::lazy("idle/wander")),
//! ]);
//!
//! // "combat/melee" is grafted here; "idle/wander" waits for its first tick.
//! let instance = template.clone_task(&library)?;
//! ```

use crate::{
    ChildSlot, Decorator, Result, Status, SubtreeResolver, Task, TaskCore, TaskError, TaskId,
    TaskMetadata,
};

const NAME: &str = "Include";

/// Descriptor for tree editors and parsers: two attributes, no inline children.
pub static INCLUDE_METADATA: TaskMetadata = TaskMetadata::placeholder(&["subtree", "lazy"]);

/// When an [`Include`] grafts its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Inclusion {
    /// At clone time; the `Include` is replaced by the subtree root.
    #[default]
    Eager,
    /// On first attach to a running parent.
    Lazy,
}

impl From<bool> for Inclusion {
    fn from(lazy: bool) -> Self {
        if lazy {
            Inclusion::Lazy
        } else {
            Inclusion::Eager
        }
    }
}

/// A decorator that grafts a subtree resolved from a reference.
pub struct Include<C> {
    core: TaskCore,
    subtree: Option<String>,
    inclusion: Inclusion,
    child: ChildSlot<C>,
}

impl<C> Include<C> {
    /// Creates an eager `Include` with no subtree reference.
    ///
    /// The reference is expected to be filled in by tooling; resolving an
    /// `Include` without one fails with `UnresolvedReference`.
    pub fn new() -> Self {
        Self::build(None, Inclusion::Eager)
    }

    /// Creates an eager `Include` for the given subtree.
    pub fn with_subtree(subtree: impl Into<String>) -> Self {
        Self::build(Some(subtree.into()), Inclusion::Eager)
    }

    /// Creates an eager (`lazy == false`) or lazy `Include` for the given subtree.
    pub fn with_mode(subtree: impl Into<String>, lazy: bool) -> Self {
        Self::build(Some(subtree.into()), Inclusion::from(lazy))
    }

    /// Creates a lazy `Include` for the given subtree.
    pub fn lazy(subtree: impl Into<String>) -> Self {
        Self::build(Some(subtree.into()), Inclusion::Lazy)
    }

    fn build(subtree: Option<String>, inclusion: Inclusion) -> Self {
        Self {
            core: TaskCore::new(),
            subtree,
            inclusion,
            child: ChildSlot::empty(),
        }
    }

    pub fn subtree(&self) -> Option<&str> {
        self.subtree.as_deref()
    }

    pub fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    #[inline]
    pub fn is_lazy(&self) -> bool {
        self.inclusion == Inclusion::Lazy
    }

    /// Whether the subtree has been grafted as this instance's child.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !self.child.is_empty()
    }

    fn create_subtree_root_task(
        &self,
        resolver: &dyn SubtreeResolver<C>,
    ) -> Result<Box<dyn Task<C>>> {
        let reference = self
            .subtree
            .as_deref()
            .ok_or_else(|| TaskError::unresolved(""))?;
        resolver.create_root_task(reference)
    }
}

impl<C> Default for Include<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Task<C> for Include<C> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn metadata(&self) -> &'static TaskMetadata {
        &INCLUDE_METADATA
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

    fn add_child(&mut self, _child: Box<dyn Task<C>>) -> Result<()> {
        Err(TaskError::InvalidOperation {
            task: NAME,
            reason: "the child of an Include is resolved, not authored",
        })
    }

    fn copy_fields(&self) -> Result<Box<dyn Task<C>>> {
        if !self.is_lazy() {
            return Err(TaskError::CloneError {
                task: NAME,
                reason: "a non-lazy Include should never be copied",
            });
        }
        Ok(Box::new(Self::build(self.subtree.clone(), self.inclusion)))
    }

    /// Returns the resolved subtree if eager, otherwise an unresolved copy.
    ///
    /// A lazy copy never inherits this instance's resolved child: each
    /// instance grafts its own subtree on first attach.
    fn clone_task(&self, resolver: &dyn SubtreeResolver<C>) -> Result<Box<dyn Task<C>>> {
        if self.is_lazy() {
            return self.copy_fields();
        }

        let root = self.create_subtree_root_task(resolver)?;
        tracing::debug!(
            subtree = ?self.subtree,
            include = %self.core.id(),
            root = %root.id(),
            "grafted eager subtree at clone time"
        );
        Ok(root)
    }

    /// Resolves the subtree on first call, then records the parent.
    fn set_control(&mut self, control: TaskId, resolver: &dyn SubtreeResolver<C>) -> Result<()> {
        if !self.is_lazy() {
            return Err(TaskError::InvalidOperation {
                task: NAME,
                reason: "a non-lazy Include isn't meant to be run",
            });
        }

        if self.child.is_empty() {
            let depth = resolver.inclusion_depth();
            if let Some(limit) = resolver.inclusion_limit().filter(|&limit| depth > limit) {
                return Err(TaskError::IncludeDepthExceeded {
                    reference: self.subtree.clone().unwrap_or_default(),
                    limit,
                });
            }
            let root = self.create_subtree_root_task(resolver)?;
            tracing::debug!(
                subtree = ?self.subtree,
                include = %self.core.id(),
                root = %root.id(),
                "grafted lazy subtree on first attach"
            );
            self.child.fill(NAME, root)?;
        }

        self.core.attach(NAME, control)
    }

    fn tick(&mut self, ctx: &mut C, resolver: &dyn SubtreeResolver<C>) -> Result<Status> {
        if !self.is_lazy() {
            return Err(TaskError::InvalidOperation {
                task: NAME,
                reason: "a non-lazy Include isn't meant to be run",
            });
        }
        let id = self.core.id();
        self.child.tick_beneath(NAME, id, ctx, &Beneath { outer: resolver })
    }
}

/// Resolver seen by a lazily grafted subtree: the caller's, one level deeper.
struct Beneath<'a, C> {
    outer: &'a dyn SubtreeResolver<C>,
}

impl<C> SubtreeResolver<C> for Beneath<'_, C> {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>> {
        self.outer.create_root_task(reference)
    }

    fn inclusion_depth(&self) -> usize {
        self.outer.inclusion_depth() + 1
    }

    fn inclusion_limit(&self) -> Option<usize> {
        self.outer.inclusion_limit()
    }
}

impl<C: 'static> Decorator<C> for Include<C> {
    fn child(&self) -> Option<&dyn Task<C>> {
        self.child.get()
    }
}
