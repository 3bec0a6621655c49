//! The three small protocols the upstream `gen::merge` / `gen::similar` /
//! `gen::base` template-dispatch shim is replaced with, per DESIGN.md.

/// Types that can absorb another instance's data in place.
pub trait CanMerge {
    /// Merges `other`'s data into `self`.
    fn merge(&mut self, other: &Self);
}

/// Types with a notion of structural similarity looser than equality (same
/// shape up to renaming), used by [`super::graph::Graph::reduce`].
pub trait IsSimilar {
    /// Whether `self` and `other` are similar.
    fn similar(&self, other: &Self) -> bool;
}

/// Types that can be projected to an ordering key `U`, used by
/// [`super::graph::Graph::sort`] and [`super::repository::Repository`].
pub trait HasBase<U> {
    /// Extracts the base key, or `None` if this value has no base (e.g. an
    /// empty group).
    fn base(&self) -> Option<U>;
}

/// Default string merge: concatenation, matching the upstream generics
/// shim's string specialization.
impl CanMerge for String {
    fn merge(&mut self, other: &Self) {
        self.push_str(other);
    }
}

/// Types that can flatten their own recursion-group data into a
/// [`crate::term::Signature`], used by [`super::graph::Graph::signatures`]
/// and [`super::repository::Repository`].
pub trait HasSignature {
    /// This vertex's signature.
    fn signature(&self) -> crate::term::Signature;

    /// Every distinct factor touched by this vertex.
    fn factors(&self) -> std::collections::BTreeSet<crate::core::Factor>;

    /// Aggregate factor occurrence counts across this vertex.
    fn map_of_factors(&self) -> std::collections::BTreeMap<crate::core::Factor, i32>;
}
