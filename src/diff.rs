//! Snapshot differences between two stores.

use std::collections::HashSet;

use crate::statement::Statement;
use crate::store::Store;

/// Statements kept by `a` that `b` does not keep, in `a`'s iteration order.
pub fn difference(a: &Store, b: &Store) -> Vec<Statement> {
    a.iter().filter(|statement| !b.contains(statement)).cloned().collect()
}

/// Statements of `a` that also occur in `b`, in `a`'s order.
pub fn intersection(a: &[Statement], b: &[Statement]) -> Vec<Statement> {
    let b: HashSet<&Statement> = b.iter().collect();
    a.iter().filter(|statement| b.contains(statement)).cloned().collect()
}

/// Statements of `a` that do not occur in `b`, in `a`'s order.
pub fn subtract(a: &[Statement], b: &[Statement]) -> Vec<Statement> {
    let b: HashSet<&Statement> = b.iter().collect();
    a.iter().filter(|statement| !b.contains(statement)).cloned().collect()
}

/// What one side did to a base snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: Vec<Statement>,
    pub removed: Vec<Statement>,
}

impl Delta {
    pub fn between(base: &Store, changed: &Store) -> Self {
        Self {
            added: difference(changed, base),
            removed: difference(base, changed),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
