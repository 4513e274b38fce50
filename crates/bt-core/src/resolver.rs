//! Subtree resolution contract.

use std::sync::Arc;

use crate::{Result, Task, TaskError};

/// Produces fresh root tasks for subtree references.
///
/// Every call must return a newly constructed, independently owned tree:
/// callers install the result directly and never share it between
/// `Include` instances. Unknown or malformed references fail with
/// [`TaskError::UnresolvedReference`](crate::TaskError::UnresolvedReference).
///
/// Any caching of parsed definitions is the resolver's own business.
///
/// A lazy `Include` ticks its subtree with a resolver one level deeper than
/// its own. Resolvers that return `Some` from
/// [`inclusion_limit`](SubtreeResolver::inclusion_limit) cap how deep those
/// run-time grafts may nest.
pub trait SubtreeResolver<C>: Send + Sync {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>>;

    /// Number of lazy `Include`s currently ticking above the caller.
    #[inline]
    fn inclusion_depth(&self) -> usize {
        0
    }

    /// Deepest lazy nesting allowed, or `None` for no limit.
    #[inline]
    fn inclusion_limit(&self) -> Option<usize> {
        None
    }
}

impl<C, R> SubtreeResolver<C> for Arc<R>
where
    R: SubtreeResolver<C> + ?Sized,
{
    #[inline]
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>> {
        (**self).create_root_task(reference)
    }

    #[inline]
    fn inclusion_depth(&self) -> usize {
        (**self).inclusion_depth()
    }

    #[inline]
    fn inclusion_limit(&self) -> Option<usize> {
        (**self).inclusion_limit()
    }
}

/// Resolver for trees that include nothing: every reference is unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl<C> SubtreeResolver<C> for NullResolver {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>> {
        Err(TaskError::unresolved(reference))
    }
}
