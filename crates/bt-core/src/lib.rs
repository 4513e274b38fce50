//! Behavior tree composition and subtree inclusion.
//!
//! This library builds behavior trees as owned task hierarchies, clones them
//! into independent per-agent instances, and grafts externally defined
//! subtrees into a host tree by reference.
//!
//! - **Templates and instances**: Trees are authored once and cloned per
//!   agent; a clone never shares a mutable node with its source
//! - **Subtree inclusion**: [`Include`] nodes graft a referenced subtree
//!   either when the tree is cloned (eager) or on first attach (lazy)
//! - **Fail fast**: Running an eager `Include` or copying one is an error,
//!   never a silent difference in tree shape
//! - **Turn-based ticks**: Every tick completes immediately, Success or Failure
//!
//! # Architecture
//!
//! - [`Task`]: Core trait for all nodes, with the cloning and attach contracts
//! - [`SubtreeResolver`]: Produces fresh subtree roots from references
//! - [`SubtreeLibrary`]: Registry of archetype trees implementing the resolver
//! - [`BehaviorTree`]: One agent's instantiated tree
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`], [`AlwaysSucceed`], [`Include`]
//! - Leaf nodes: [`Action`], [`Condition`]

pub mod builder;
pub mod composite;
pub mod config;
pub mod decorator;
pub mod error;
pub mod include;
pub mod leaf;
pub mod library;
pub mod metadata;
pub mod resolver;
pub mod status;
pub mod task;
pub mod tree;

// Re-export core types for ergonomic API
pub use composite::{Selector, Sequence};
pub use config::LibraryConfig;
pub use decorator::{AlwaysSucceed, ChildSlot, Decorator, Inverter};
pub use error::{Result, TaskError};
pub use include::{INCLUDE_METADATA, Include, Inclusion};
pub use leaf::{Action, Condition};
pub use library::SubtreeLibrary;
pub use metadata::TaskMetadata;
pub use resolver::{NullResolver, SubtreeResolver};
pub use status::Status;
pub use task::{Task, TaskCore, TaskId, walk};
pub use tree::BehaviorTree;
