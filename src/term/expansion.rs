//! A recursion expansion (distribution): a root term equal to the sum of
//! its summand terms.

use super::recursion_term::RecursionTerm;

/// `root = sum(summands)`, as an algebraic identity under the recurrence
/// law that produced it. Summands are kept in driver-emission order; no
/// canonical sort is required for correctness.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecursionExpansion {
    root: RecursionTerm,
    summands: Vec<RecursionTerm>,
}

impl RecursionExpansion {
    /// Creates an expansion from a root and its summands.
    #[must_use]
    pub const fn new(root: RecursionTerm, summands: Vec<RecursionTerm>) -> Self {
        Self { root, summands }
    }

    /// The root term.
    #[must_use]
    pub const fn root(&self) -> &RecursionTerm {
        &self.root
    }

    /// The summand terms.
    #[must_use]
    pub fn summands(&self) -> &[RecursionTerm] {
        &self.summands
    }
}
