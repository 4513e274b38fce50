//! Static task descriptors for editors and tree parsers.
//!
//! A [`TaskMetadata`] is pure data: it names the configurable attributes of
//! a task type and how many children may be authored beneath it. Nothing at
//! runtime consults it beyond [`Task::metadata`](crate::Task::metadata).

/// Static description of a task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMetadata {
    attributes: &'static [&'static str],
    min_children: usize,
    max_children: Option<usize>,
}

impl TaskMetadata {
    /// Creates a descriptor. `max_children == None` means unbounded.
    pub const fn new(
        attributes: &'static [&'static str],
        min_children: usize,
        max_children: Option<usize>,
    ) -> Self {
        Self {
            attributes,
            min_children,
            max_children,
        }
    }

    /// A task with no children.
    pub const fn leaf(attributes: &'static [&'static str]) -> Self {
        Self::new(attributes, 0, Some(0))
    }

    /// A task whose only child is resolved at run time, never authored.
    ///
    /// Authors see it as childless, like a leaf.
    pub const fn placeholder(attributes: &'static [&'static str]) -> Self {
        Self::new(attributes, 0, Some(0))
    }

    /// A task wrapping exactly one authored child.
    pub const fn decorator(attributes: &'static [&'static str]) -> Self {
        Self::new(attributes, 1, Some(1))
    }

    /// A task with one or more authored children.
    pub const fn composite(attributes: &'static [&'static str]) -> Self {
        Self::new(attributes, 1, None)
    }

    pub fn attributes(&self) -> &'static [&'static str] {
        self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }

    pub fn min_children(&self) -> usize {
        self.min_children
    }

    pub fn max_children(&self) -> Option<usize> {
        self.max_children
    }

    /// Whether an author may place `count` children under this task type.
    pub fn accepts_children(&self, count: usize) -> bool {
        count >= self.min_children && self.max_children.is_none_or(|max| count <= max)
    }
}
