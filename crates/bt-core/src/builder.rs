//! Builder utilities for ergonomic tree construction.
//!
//! This module provides helper functions to reduce boilerplate when authoring
//! trees. Instead of writing verbose `Box::new(Sequence::new(vec![...]))`,
//! you can use shorter functions like `sequence(vec![...])`.

use crate::{Action, AlwaysSucceed, Condition, Include, Inverter, Selector, Sequence, Status, Task};

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Task<C>>>) -> Box<dyn Task<C>> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(children))`.
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Task<C>>>) -> Box<dyn Task<C>> {
    Box::new(Selector::new(children))
}

/// Creates an inverter node.
#[inline]
pub fn inverter<C: 'static>(child: Box<dyn Task<C>>) -> Box<dyn Task<C>> {
    Box::new(Inverter::new(child))
}

/// Creates an always-succeed node.
#[inline]
pub fn always_succeed<C: 'static>(child: Box<dyn Task<C>>) -> Box<dyn Task<C>> {
    Box::new(AlwaysSucceed::new(child))
}

#[inline]
pub fn action<C: 'static>(
    run: impl Fn(&mut C) -> Status + Send + Sync + 'static,
) -> Box<dyn Task<C>> {
    Box::new(Action::new(run))
}

#[inline]
pub fn condition<C: 'static>(
    predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
) -> Box<dyn Task<C>> {
    Box::new(Condition::new(predicate))
}

/// Creates an eager include, grafted when the tree is cloned.
#[inline]
pub fn include<C: 'static>(subtree: impl Into<String>) -> Box<dyn Task<C>> {
    Box::new(Include::with_subtree(subtree))
}

/// Creates a lazy include, grafted on its first tick.
#[inline]
pub fn lazy_include<C: 'static>(subtree: impl Into<String>) -> Box<dyn Task<C>> {
    Box::new(Include::lazy(subtree))
}
