//! A recursion group: the set of expansions sharing a scope (e.g. every
//! component of one target integral-with-prefixes).

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{Factor, IntegralComponent};
use crate::graph::traits::{CanMerge, HasBase, HasSignature, IsSimilar};

use super::expansion::RecursionExpansion;
use super::recursion_term::RecursionTerm;
use super::signature::Signature;

/// A sorted set of [`RecursionExpansion`]s sharing a scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecursionGroup {
    expansions: BTreeSet<RecursionExpansion>,
}

impl RecursionGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a group from an initial set of expansions.
    #[must_use]
    pub fn from_expansions(expansions: impl IntoIterator<Item = RecursionExpansion>) -> Self {
        Self {
            expansions: expansions.into_iter().collect(),
        }
    }

    /// Inserts an expansion.
    pub fn insert(&mut self, expansion: RecursionExpansion) {
        self.expansions.insert(expansion);
    }

    /// The expansions in this group.
    #[must_use]
    pub const fn expansions(&self) -> &BTreeSet<RecursionExpansion> {
        &self.expansions
    }

    /// Root terms of every expansion in this group.
    #[must_use]
    pub fn roots(&self) -> Vec<&RecursionTerm> {
        self.expansions.iter().map(RecursionExpansion::root).collect()
    }

    /// Every distinct integral appearing anywhere (root or summand) in this
    /// group.
    #[must_use]
    pub fn unique_integrals(&self) -> BTreeSet<IntegralComponent> {
        let mut out = BTreeSet::new();
        for expansion in &self.expansions {
            out.insert(expansion.root().integral().clone());
            for summand in expansion.summands() {
                out.insert(summand.integral().clone());
            }
        }
        out
    }

    /// Every distinct factor appearing anywhere in this group.
    #[must_use]
    pub fn unique_factors(&self) -> BTreeSet<Factor> {
        let mut out = BTreeSet::new();
        for expansion in &self.expansions {
            out.extend(expansion.root().map_of_factors().keys().cloned());
            for summand in expansion.summands() {
                out.extend(summand.map_of_factors().keys().cloned());
            }
        }
        out
    }

    /// The minimum auxiliary order occurring anywhere in this group, or
    /// `None` if the group is empty.
    #[must_use]
    pub fn min_order(&self) -> Option<i32> {
        self.unique_integrals().iter().map(IntegralComponent::order).min()
    }

    /// Normalizes every expansion so that [`Self::min_order`] becomes 0,
    /// shifting every root and summand integral down by that minimum.
    /// Idempotent: calling `reduce` on an already-reduced group is a no-op.
    #[must_use]
    pub fn reduce(&self) -> Self {
        let Some(m_min) = self.min_order() else {
            return self.clone();
        };
        if m_min == 0 {
            return self.clone();
        }
        let mut reduced = BTreeSet::new();
        for expansion in &self.expansions {
            let root = shift_term_order(expansion.root(), -m_min);
            let summands = expansion
                .summands()
                .iter()
                .map(|s| shift_term_order(s, -m_min))
                .collect();
            reduced.insert(RecursionExpansion::new(root, summands));
        }
        Self { expansions: reduced }
    }

    /// This group's [`Signature`].
    #[must_use]
    pub fn signature(&self) -> Signature {
        let reduced = self.reduce();
        let out_params = reduced.roots().into_iter().map(|t| t.integral().clone()).collect();
        let inp_params = reduced
            .expansions
            .iter()
            .flat_map(RecursionExpansion::summands)
            .map(|t| t.integral().clone())
            .collect();
        Signature::new(out_params, inp_params, reduced.unique_factors())
    }
}

fn shift_term_order(term: &RecursionTerm, delta: i32) -> RecursionTerm {
    term.shift_order(delta)
        .expect("m_min is the true minimum order in the group; shifting by -m_min cannot go negative")
}

impl CanMerge for RecursionGroup {
    fn merge(&mut self, other: &Self) {
        for expansion in &other.expansions {
            let already_present = self
                .expansions
                .iter()
                .any(|existing| existing.root() == expansion.root());
            if !already_present {
                self.expansions.insert(expansion.clone());
            }
        }
    }
}

impl IsSimilar for RecursionGroup {
    fn similar(&self, other: &Self) -> bool {
        if self.expansions.len() != other.expansions.len() {
            return false;
        }
        self.expansions
            .iter()
            .zip(other.expansions.iter())
            .all(|(a, b)| a.root().similar(b.root()))
    }
}

impl HasBase<IntegralComponent> for RecursionGroup {
    fn base(&self) -> Option<IntegralComponent> {
        self.roots().first().map(|t| t.integral().base())
    }
}

impl HasSignature for RecursionGroup {
    fn signature(&self) -> Signature {
        RecursionGroup::signature(self)
    }

    fn factors(&self) -> BTreeSet<Factor> {
        self.unique_factors()
    }

    fn map_of_factors(&self) -> BTreeMap<Factor, i32> {
        let mut out: BTreeMap<Factor, i32> = BTreeMap::new();
        for expansion in &self.expansions {
            for (factor, order) in expansion.root().map_of_factors() {
                *out.entry(factor.clone()).or_insert(0) += order;
            }
            for summand in expansion.summands() {
                for (factor, order) in summand.map_of_factors() {
                    *out.entry(factor.clone()).or_insert(0) += order;
                }
            }
        }
        out
    }
}
