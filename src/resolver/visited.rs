//! Set of components already reached during one installation request

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Shared visited set; check-then-insert is a single locked step
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `identifier` as visited; returns `false` if it already was
    pub fn insert(&self, identifier: &str) -> bool {
        let mut visited = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        visited.insert(identifier.to_string())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
