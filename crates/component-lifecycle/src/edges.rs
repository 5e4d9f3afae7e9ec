//! # Dependency Edge Registry
//!
//! Per-component adjacency bookkeeping. Each cell stores both directions of every edge
//! it takes part in, so "does A depend on B" and "is A needed by B" are both O(1).
//!
//! The registry is a queryable edge store only. Ordering and cycle detection belong to
//! the orchestrator, which reads these sets.

use std::collections::HashSet;

/// Both edge sets of a single component.
#[derive(Debug, Default, Clone)]
pub struct DependencyEdges {
    depends_on: HashSet<String>,
    depended_on_by: HashSet<String>,
}

impl DependencyEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that this component requires `name`. Returns `false` if already known.
    pub fn add_depends_on(&mut self, name: impl Into<String>) -> bool {
        self.depends_on.insert(name.into())
    }

    /// Records that `name` requires this component. Returns `false` if already known.
    pub fn add_depended_on_by(&mut self, name: impl Into<String>) -> bool {
        self.depended_on_by.insert(name.into())
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.depends_on.contains(name)
    }

    pub fn is_depended_on_by(&self, name: &str) -> bool {
        self.depended_on_by.contains(name)
    }

    /// Sorted snapshot of the components this one requires.
    pub fn dependencies(&self) -> Vec<String> {
        sorted(&self.depends_on)
    }

    /// Sorted snapshot of the components requiring this one.
    pub fn dependents(&self) -> Vec<String> {
        sorted(&self.depended_on_by)
    }
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut names: Vec<String> = set.iter().cloned().collect();
    names.sort();
    names
}
