//! Registry of named archetype trees.
//!
//! The [`SubtreeLibrary`] is the bundled [`SubtreeResolver`]: it maps
//! reference strings to archetype trees and hands out a fresh clone of the
//! archetype on every request.
//!
//! # Design
//!
//! - **Archetypes**: Registered once, never ticked, never handed out directly
//! - **Instances**: Produced through [`Task::clone_task`], so eager
//!   `Include`s inside an archetype are grafted recursively
//! - **Depth guard**: Nested eager resolution at clone time and nested lazy
//!   resolution at run time are both bounded by
//!   [`LibraryConfig::max_include_depth`]
//!
//! ```text
//! SubtreeLibrary
//! ├── archetypes: HashMap<String, Box<dyn Task<C>>>
//! └── config: LibraryConfig
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::{BehaviorTree, LibraryConfig, Result, SubtreeResolver, Task, TaskError};

/// Named archetype trees, resolvable by reference.
pub struct SubtreeLibrary<C> {
    archetypes: HashMap<String, Box<dyn Task<C>>>,
    config: LibraryConfig,
}

impl<C: 'static> SubtreeLibrary<C> {
    pub fn new() -> Self {
        Self::with_config(LibraryConfig::default())
    }

    pub fn with_config(config: LibraryConfig) -> Self {
        Self {
            archetypes: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Register an archetype under `reference`.
    ///
    /// If an archetype already exists for this reference, it is replaced and
    /// the previous one returned.
    pub fn register(
        &mut self,
        reference: impl Into<String>,
        root: Box<dyn Task<C>>,
    ) -> Option<Box<dyn Task<C>>> {
        self.archetypes.insert(reference.into(), root)
    }

    /// Remove the archetype registered under `reference`.
    pub fn unregister(&mut self, reference: &str) -> Option<Box<dyn Task<C>>> {
        self.archetypes.remove(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.archetypes.contains_key(reference)
    }

    /// The registered archetype itself. Clone it before running it.
    pub fn archetype(&self, reference: &str) -> Option<&dyn Task<C>> {
        self.archetypes.get(reference).map(|root| root.as_ref())
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Instantiate the archetype under `reference` as a runnable tree.
    ///
    /// The tree keeps this library as its resolver for lazy inclusion.
    pub fn create_tree(self: &Arc<Self>, reference: &str) -> Result<BehaviorTree<C>> {
        let root = self.create_root_task(reference)?;
        let resolver: Arc<dyn SubtreeResolver<C>> = Arc::clone(self) as _;
        Ok(BehaviorTree::new(root, resolver))
    }

    fn resolve_at(&self, reference: &str, depth: usize) -> Result<Box<dyn Task<C>>> {
        let Some(archetype) = self.archetypes.get(reference) else {
            tracing::debug!(reference, "no archetype registered for subtree reference");
            return Err(TaskError::unresolved(reference));
        };

        if depth > self.config.max_include_depth {
            return Err(TaskError::IncludeDepthExceeded {
                reference: reference.to_string(),
                limit: self.config.max_include_depth,
            });
        }

        tracing::trace!(reference, depth, "cloning archetype");
        archetype.clone_task(&Nested {
            library: self,
            depth: depth + 1,
        })
    }
}

impl<C: 'static> Default for SubtreeLibrary<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> SubtreeResolver<C> for SubtreeLibrary<C> {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>> {
        self.resolve_at(reference, 0)
    }

    fn inclusion_limit(&self) -> Option<usize> {
        Some(self.config.max_include_depth)
    }
}

/// Resolver handed to an archetype while it is being cloned, one level
/// deeper than its caller.
struct Nested<'a, C> {
    library: &'a SubtreeLibrary<C>,
    depth: usize,
}

impl<C: 'static> SubtreeResolver<C> for Nested<'_, C> {
    fn create_root_task(&self, reference: &str) -> Result<Box<dyn Task<C>>> {
        self.library.resolve_at(reference, self.depth)
    }

    fn inclusion_limit(&self) -> Option<usize> {
        self.library.inclusion_limit()
    }
}
