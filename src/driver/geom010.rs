//! First-derivative-on-ket-center-1 geometric variant of the three-center
//! electron-repulsion recursion: `d/dC (a|cd)`, matching prefix-order
//! pattern `(0, 1, 0)` (no derivative on the bra center `A` or ket center
//! `D`, a first derivative on ket center `C`).
//!
//! Grounded in `original_source/src/recursions/v3i_geom010_eri_driver.cpp`
//! (`is_electron_repulsion`'s `prefixes_order() == {0, 1, 0}` guard) and the
//! general geometric-derivative law §4.3/§9 describes: a coordinate
//! derivative of a Gaussian w.r.t. its own center is itself a combination of
//! raising and lowering that center's angular momentum by one, with no
//! auxiliary-order shift —
//! `d/dC_axis (a, C^n, d| = 2 zeta_C (a, C^{n+1}, d| - n (a, C^{n-1}, d|`
//! (the standard Gaussian-derivative identity; `zeta_C` is the ket center's
//! own exponent, carried here as the scalar factor `"zeta_C"`). Applying it
//! drops the prefix entirely — the derivative has been fully absorbed into
//! plain angular-momentum shifts, matching the upstream's `tval->base()`
//! call once the prefix-order vector reaches `{0, 0, 0}`.

use std::collections::BTreeSet;

use crate::config::DriverConfig;
use crate::core::{Factor, Fraction, IntegralComponent, Target};
use crate::graph::Graph;
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

use super::closure::drive_closure;
use super::AXES;

/// The prefix-order pattern this driver accepts: derivative order 1 on the
/// bra's ket-side neighbor (ket center `C`, index 1 in the three-center
/// bra+ket numbering), none on the bra or on ket center `D`.
const ACCEPTED_PREFIX_ORDER: [i32; 3] = [0, 1, 0];

/// The first-derivative-on-ket-center-`C` geometric variant of the 3-center
/// ERI recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geom010EriDriver {
    config: DriverConfig,
}

impl Geom010EriDriver {
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

    /// Whether `term`'s prefix-order vector matches `(0, 1, 0)`: a bare
    /// first derivative on ket center `C`, nothing on `A` or `D`.
    #[must_use]
    pub fn accepts(&self, term: &RecursionTerm) -> bool {
        let orders = term.integral().prefixes_order();
        orders.len() == 1
            && term.integral().prefixes()[0].target() == Target::Ket
            && prefix_order_vector(term) == ACCEPTED_PREFIX_ORDER
    }

    /// Lifts the derivative prefix along `axis` into two plain (prefix-free)
    /// integrals: the ket-`C`-raised term with factor `zeta_C` and
    /// coefficient `+2`, and the ket-`C`-lowered term with coefficient
    /// `-n` where `n` is `C`'s exponent along `axis` before the shift.
    /// Returns `None` if `term` does not match the accepted prefix pattern,
    /// or if the lowering shift is inapplicable (bare `s`-shell `C`, `n=0`:
    /// the raising term alone still applies, so only the lowering summand
    /// is omitted in that case — `n=0` also zeroes its coefficient, so the
    /// omission changes nothing algebraically).
    #[must_use]
    pub fn apply_derivative(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        if !self.accepts(term) {
            return None;
        }
        let base = term.integral().base();
        let c = base.ket().shape_at(0);
        let n = c.exponent(axis);

        let c_up = base.shift(axis, 1, 1)?;
        let mut term_up = RecursionTerm::new(c_up);
        term_up.add(Factor::scalar("zeta_C"), Fraction::from_int(2));

        let mut summands = vec![term_up];
        if n > 0 {
            let c_down = base.shift(axis, -1, 1)?;
            let mut term_down = RecursionTerm::new(c_down);
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
    pub fn apply_ket_hrr(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        self.apply_over_axes(term, sints)
    }

    /// Drives [`Self::apply_ket_hrr`] to a fixed point over every root in
    /// `group`.
    #[must_use]
    pub fn apply_ket_hrr_for_group(&self, group: &RecursionGroup) -> Graph<RecursionGroup> {
        let seeds: Vec<IntegralComponent> = group.roots().into_iter().map(|t| t.integral().clone()).collect();
        drive_closure(&seeds, |term, sints| self.apply_ket_hrr(term, sints), self.config.budget())
    }
}

fn prefix_order_vector(term: &RecursionTerm) -> [i32; 3] {
    // Three-center prefix-order convention: [gA, gC, gD]. This driver only
    // ever sees a single ket-targeted prefix, so the bra (gA) and ket-D
    // (gD) slots are always 0 by construction of `accepts`'s caller.
    let order = term.integral().prefixes().first().map_or(0, |p| p.shape().order());
    [0, order, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, Tensor, TensorComponent};

    fn derivative_term(c_order: i32) -> RecursionTerm {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::new(c_order, 0, 0), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let prefix = Operator::new("d/dC", Tensor::new(1), "ket", 1)
            .expect("valid target")
            .components()
            .remove(0);
        RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, 0, vec![prefix]))
    }

    #[test]
    fn rejects_integrals_outside_the_accepted_prefix_pattern() {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let integral = IntegralComponent::new(bra, ket, integrand, 0, vec![]);
        let term = RecursionTerm::new(integral);
        let driver = Geom010EriDriver::new();
        assert!(!driver.accepts(&term));
        assert_eq!(driver.apply_derivative(&term, 'x'), None);
    }

    #[test]
    fn lifts_derivative_into_raise_and_lower_with_no_auxiliary_shift() {
        let term = derivative_term(1);
        let driver = Geom010EriDriver::new();
        let mut sints = BTreeSet::new();
        let expansion = driver.apply_ket_hrr(&term, &mut sints).expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 2);
        for summand in expansion.summands() {
            assert!(summand.integral().is_simple(), "derivative prefix must be fully absorbed");
            assert_eq!(summand.integral().order(), 0, "no auxiliary-order shift in this law");
        }
        assert!(!sints.is_empty());
    }

    #[test]
    fn s_shell_c_has_no_lowering_summand() {
        let term = derivative_term(0);
        let driver = Geom010EriDriver::new();
        let mut sints = BTreeSet::new();
        let expansion = driver.apply_ket_hrr(&term, &mut sints).expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 1);
    }
}
