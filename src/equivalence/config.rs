//! Checker configuration parameters.

use serde::{Deserialize, Serialize};

/// Equivalence checker configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Fuse the neighbours of a set emptied by `remove_card` when they
    /// belong to the same owner (default: true).
    /// Once the separating cards are gone, the two runs are interchangeable.
    pub merge_adjacent: bool,

    /// Check `prev`/`next` links when building a checker (default: true).
    /// Links must name known sets and mirror each other.
    pub strict_links: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            merge_adjacent: true,
            strict_links: true,
        }
    }
}

impl CheckerConfig {
    /// Create a new config with custom merge behaviour.
    pub fn with_merge_adjacent(mut self, merge: bool) -> Self {
        self.merge_adjacent = merge;
        self
    }

    /// Create a new config with custom link checking.
    pub fn with_strict_links(mut self, strict: bool) -> Self {
        self.strict_links = strict;
        self
    }
}
