//! Second-derivative four-center geometric variant of the electron-repulsion
//! recursion: `d^2/dA^2 (ab|cd)`-style integrals with a prefix order of 2 on
//! a single bra center.
//!
//! `original_source/src/recursions/v4i_geom20_eri_driver.hpp` declares this
//! driver's interface (`is_electron_repulsion`, `bra_hrr`,
//! `apply_bra_hrr_recursion`, `create_bra_hrr_recursion`) but the retrieval
//! pack carries no matching `.cpp`. As with `geom100.rs` (also grounded on no
//! `.cpp`), this is implemented via the generic closed-form Gaussian
//! self-derivative identity from `geom010.rs`/`geom100.rs`, applied twice:
//! a single derivative is `d/dA_axis f_n = 2 zeta_A f_{n+1} - n f_{n-1}`;
//! differentiating that expression again (the inner `f_{n+1}`/`f_{n-1}`
//! themselves obey the same rule one order up/down) and collecting terms
//! gives the standard second-derivative ladder
//! `d^2/dA_axis^2 f_n = 4 zeta_A^2 f_{n+2} - 2 zeta_A (2n+1) f_n + n(n-1) f_{n-2}`,
//! with no auxiliary-order shift — the same "fully absorbed by angular-
//! momentum shifts alone" structure as the first-derivative variants.

use std::collections::BTreeSet;

use crate::config::DriverConfig;
use crate::core::{Factor, Fraction, IntegralComponent, Target};
use crate::graph::Graph;
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

use super::closure::drive_closure;
use super::AXES;

/// The prefix-order pattern this driver's interface targets: a bare second
/// derivative on the bra's first center, nothing else.
const ACCEPTED_PREFIX_ORDER: [i32; 4] = [2, 0, 0, 0];

/// Second-derivative-on-bra-center-0 geometric variant of the 4-center ERI
/// recursion. See the module documentation for the closed-form identity
/// this driver's `bra_hrr` applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geom20EriDriver {
    config: DriverConfig,
}

impl Geom20EriDriver {
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

    /// Whether `term` carries the accepted `(2, 0, 0, 0)` prefix-order
    /// pattern this driver's interface targets.
    #[must_use]
    pub fn accepts(&self, term: &RecursionTerm) -> bool {
        let orders = term.integral().prefixes_order();
        orders.len() == 1
            && term.integral().prefixes()[0].target() == Target::Bra
            && term.integral().prefixes()[0].center() == 0
            && prefix_order_vector(&orders) == ACCEPTED_PREFIX_ORDER
    }

    /// Lifts the second-derivative prefix along `axis` into up to three
    /// plain (prefix-free) integrals: the bra-`A`-raised-by-2 term with
    /// factor `zeta_A` at order 2 and coefficient `+4`, the order-unchanged
    /// term with coefficient `-2*(2n+1)` (`n` is `A`'s exponent along
    /// `axis` before the shift), and — only when `n >= 2` — the
    /// bra-`A`-lowered-by-2 term with coefficient `+n*(n-1)`. Returns `None`
    /// if `term` does not match the accepted prefix pattern, or if the
    /// raising shift is inapplicable.
    #[must_use]
    pub fn bra_hrr(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        if !self.accepts(term) {
            return None;
        }
        let base = term.integral().base();
        let a = base.bra().shape_at(0);
        let n = a.exponent(axis);

        let a_up2 = base.shift(axis, 2, 0)?;
        let mut term_up = RecursionTerm::new(a_up2);
        term_up.add(Factor::scalar("zeta_A"), Fraction::from_int(2));
        term_up.add(Factor::scalar("zeta_A"), Fraction::from_int(2));

        let mut term_mid = RecursionTerm::new(base.clone());
        term_mid.scale(Fraction::from_int(-i64::from(2 * (2 * n + 1))));

        let mut summands = vec![term_up, term_mid];
        if n >= 2 {
            let a_down2 = base.shift(axis, -2, 0)?;
            let mut term_down = RecursionTerm::new(a_down2);
            term_down.scale(Fraction::from_int(i64::from(n) * i64::from(n - 1)));
            summands.push(term_down);
        }

        Some(RecursionExpansion::new(term.clone(), summands))
    }

    fn apply_over_axes(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        for axis in AXES {
            if let Some(expansion) = self.bra_hrr(term, axis) {
                for summand in expansion.summands() {
                    sints.insert(summand.integral().clone());
                }
                return Some(expansion);
            }
        }
        None
    }

    /// Tries [`Self::bra_hrr`] on each axis in turn, recording its summands
    /// in `sints`.
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

fn prefix_order_vector(orders: &[i32]) -> [i32; 4] {
    [orders.first().copied().unwrap_or(0), 0, 0, 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, Tensor, TensorComponent};

    fn geom20_term() -> RecursionTerm {
        let bra = Collector::two("GA", TensorComponent::new(2, 0, 0), "GB", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let prefix = Operator::new("d2/dA2", Tensor::new(2), "bra", 0)
            .expect("valid target")
            .components()
            .remove(0);
        RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, 0, vec![prefix]))
    }

    #[test]
    fn accepts_the_declared_prefix_pattern() {
        let driver = Geom20EriDriver::new();
        assert!(driver.accepts(&geom20_term()));
    }

    #[test]
    fn rejects_integrals_outside_the_accepted_prefix_pattern() {
        let bra = Collector::two("GA", TensorComponent::scalar(), "GB", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let integral = IntegralComponent::new(bra, ket, integrand, 0, vec![]);
        let term = RecursionTerm::new(integral);
        let driver = Geom20EriDriver::new();
        assert!(!driver.accepts(&term));
        assert!(driver.bra_hrr(&term, 'x').is_none());
    }

    #[test]
    fn lifts_second_derivative_into_raise_mid_and_lower_with_no_auxiliary_shift() {
        let term = geom20_term();
        let driver = Geom20EriDriver::new();
        // A's exponent along x is 2, so n >= 2 and all three summands fire.
        let expansion = driver.bra_hrr(&term, 'x').expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 3);
        for summand in expansion.summands() {
            assert!(summand.integral().is_simple(), "second-derivative prefix must be fully absorbed");
            assert_eq!(summand.integral().order(), 0, "no auxiliary-order shift in this law");
        }
    }

    #[test]
    fn n_below_two_has_no_lowering_summand() {
        let bra = Collector::two("GA", TensorComponent::new(1, 0, 0), "GB", TensorComponent::scalar());
        let ket = Collector::two("GC", TensorComponent::scalar(), "GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let prefix = Operator::new("d2/dA2", Tensor::new(2), "bra", 0)
            .expect("valid target")
            .components()
            .remove(0);
        let term = RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, 0, vec![prefix]));
        let driver = Geom20EriDriver::new();
        let expansion = driver.bra_hrr(&term, 'x').expect("matches accepted prefix pattern");
        assert_eq!(expansion.summands().len(), 2);
    }

    #[test]
    fn apply_for_group_reduces_to_a_terminal_vertex() {
        let mut group = RecursionGroup::new();
        group.insert(RecursionExpansion::new(geom20_term(), Vec::new()));
        let driver = Geom20EriDriver::new();
        let graph = driver.apply_bra_hrr_for_group(&group);
        assert!(graph.order() >= 2);
        assert!(!graph.orphans().is_empty());
    }
}
