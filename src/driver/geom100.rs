//! First-derivative-on-bra-center-`A` geometric variant of the four-center
//! electron-repulsion recursion: `d/dA (ab|cd)`, matching prefix-order
//! pattern `(1, 0, 0, 0)` (a first derivative on bra center `A`, nothing on
//! `B`, `C`, or `D`).
//!
//! No `.cpp`/`.hpp` pair for a four-center `geom100` driver was present in
//! the retrieval pack (only `v3i_geom010_eri_driver.cpp` and the
//! interface-only `v4i_geom20_eri_driver.hpp` were). This driver applies the
//! same general geometric-derivative law `geom010.rs` is grounded on —
//! `d/dA_axis (A^n, B, c, d| = 2 zeta_A (A^{n+1}, B, c, d| - n (A^{n-1}, B, c, d|`
//! — to bra center `A` of the four-center integral instead of ket center
//! `C` of the three-center one. The law itself is center- and arity-agnostic
//! (it is a property of differentiating a single Gaussian primitive by its
//! own center), so generalizing it from three centers to four changes only
//! which collector and index the shift targets.

use std::collections::BTreeSet;

use crate::config::DriverConfig;
use crate::core::{Factor, Fraction, IntegralComponent, Target};
use crate::graph::Graph;
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

use super::closure::drive_closure;
use super::AXES;

/// The prefix-order pattern this driver accepts: derivative order 1 on bra
/// center `A`, none on `B`, `C`, or `D`.
const ACCEPTED_PREFIX_ORDER: [i32; 4] = [1, 0, 0, 0];

/// The first-derivative-on-bra-center-`A` geometric variant of the
/// four-center ERI recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geom100EriDriver {
    config: DriverConfig,
}

impl Geom100EriDriver {
    /// Creates a driver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver with an explicit configuration.
    #[must_use]
    pub const fn with_config(config: DriverConfig) -> Self {
        Self { config }
    }

    /// This driver's configuration.
    #[must_use]
    pub const fn config(&self) -> DriverConfig {
        self.config
    }

    /// Whether `term`'s prefix-order vector matches `(1, 0, 0, 0)`: a bare
    /// first derivative on bra center `A`, nothing on `B`, `C`, or `D`.
    #[must_use]
    pub fn accepts(&self, term: &RecursionTerm) -> bool {
        let orders = term.integral().prefixes_order();
        orders.len() == 1
            && term.integral().prefixes()[0].target() == Target::Bra
            && term.integral().prefixes()[0].center() == 0
            && prefix_order_vector(term) == ACCEPTED_PREFIX_ORDER
    }

    /// Lifts the derivative prefix along `axis` into two plain (prefix-free)
    /// integrals: the bra-`A`-raised term with factor `zeta_A` and
    /// coefficient `+2`, and the bra-`A`-lowered term with coefficient `-n`
    /// where `n` is `A`'s exponent along `axis` before the shift. Returns
    /// `None` if `term` does not match the accepted prefix pattern, or if
    /// the lowering shift is inapplicable (bare `s`-shell `A`, `n=0`: the
    /// raising term alone still applies, so only the lowering summand is
    /// omitted in that case).
    #[must_use]
    pub fn apply_derivative(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        if !self.accepts(term) {
            return None;
        }
        let base = term.integral().base();
        let a = base.bra().shape_at(0);
        let n = a.exponent(axis);

        let a_up = base.shift(axis, 1, 0)?;
        let mut term_up = RecursionTerm::new(a_up);
        term_up.add(Factor::scalar("zeta_A"), Fraction::from_int(2));

        let mut summands = vec![term_up];
        if n > 0 {
            let a_down = base.shift(axis, -1, 0)?;
            let mut term_down = RecursionTerm::new(a_down);
            term_down.scale(Fraction::from_int(-i64::from(n)));
            summands.push(term_down);
        }

        Some(RecursionExpansion::new(term.clone(), summands))
    }

    fn apply_over_axes(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        for axis in AXES {
            if let Some(expansion) = self.apply_derivative(term, axis) {
                for summand in expansion.summands() {
                    sints.insert(summand.integral().clone());
                }
                return Some(expansion);
            }
        }
        None
    }

    /// Tries [`Self::apply_derivative`] on each axis in turn, recording its
    /// summands in `sints`.
    #[must_use]
    pub fn apply_bra_hrr(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        self.apply_over_axes(term, sints)
    }

    /// Drives [`Self::apply_bra_hrr`] to a fixed point over every root in
    /// `group`.
    #[must_use]
    pub fn apply_bra_hrr_for_group(&self, group: &RecursionGroup) -> Graph<RecursionGroup> {
        let seeds: Vec<IntegralComponent> = group.roots().into_iter().map(|t| t.integral().clone()).collect();
        drive_closure(&seeds, |term, sints| self.apply_bra_hrr(term, sints), self.config.budget())
    }
}

fn prefix_order_vector(term: &RecursionTerm) -> [i32; 4] {
    // Four-center prefix-order convention: [gA, gB, gC, gD]. This driver
    // only ever sees a single bra-A-targeted prefix, so the other three
    // slots are always 0 by construction of `accepts`'s caller.
    let order = term.integral().prefixes().first().map_or(0, |p| p.shape().order());
    [order, 0, 0, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, Tensor, TensorComponent};

    fn derivative_term(a_order: i32) -> RecursionTerm {
        let bra = Collector::two("GA", TensorComponent::new(a_order, 0, 0), "GB", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let prefix = Operator::new("d/dA", Tensor::new(1), "bra", 0)
            .expect("valid target")
            .components()
            .remove(0);
        RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, 0, vec![prefix]))
    }

    #[test]
    fn rejects_integrals_outside_the_accepted_prefix_pattern() {
        let bra = Collector::two("GA", TensorComponent::scalar(), "GB", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let integral = IntegralComponent::new(bra, ket, integrand, 0, vec![]);
        let term = RecursionTerm::new(integral);
        let driver = Geom100EriDriver::new();
        assert!(!driver.accepts(&term));
        assert!(driver.apply_derivative(&term, 'x').is_none());
    }

    #[test]
    fn lifts_derivative_into_raise_and_lower_with_no_auxiliary_shift() {
        let term = derivative_term(1);
        let driver = Geom100EriDriver::new();
        let mut sints = BTreeSet::new();
        let expansion = driver.apply_bra_hrr(&term, &mut sints).expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 2);
        for summand in expansion.summands() {
            assert!(summand.integral().is_simple(), "derivative prefix must be fully absorbed");
            assert_eq!(summand.integral().order(), 0, "no auxiliary-order shift in this law");
        }
        assert!(!sints.is_empty());
    }

    #[test]
    fn s_shell_a_has_no_lowering_summand() {
        let term = derivative_term(0);
        let driver = Geom100EriDriver::new();
        let mut sints = BTreeSet::new();
        let expansion = driver.apply_bra_hrr(&term, &mut sints).expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 1);
    }
}
