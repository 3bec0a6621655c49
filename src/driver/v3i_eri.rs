//! Three-center electron-repulsion integral recursion
//! (`(a|cd)` over a single bra center `A` and two ket centers `C, D`).
//!
//! Grounded in `original_source/src/recursions/v3i_eri_driver.cpp`: that
//! file tracks only *which* integrals are needed (a `std::set` of plain
//! angular-momentum tuples), not their prefactors or named factors — the
//! factor bookkeeping lives in the algebra layer this crate already
//! implements (`term::RecursionTerm`). The single-step laws below keep the
//! upstream's choice of *which center reduces* (ket center 1 against center
//! 2 for `ket_hrr`; the lone bra center for `bra_vrr`; ket center 2 for
//! `ket_vrr`) and reuse [`super::eri::EriDriver`]'s factor conventions,
//! substituting `PA` for `PB` on the one-center bra (there is no second bra
//! center to form an `AB`-style pair with).

use std::collections::BTreeSet;

use crate::config::DriverConfig;
use crate::core::{Factor, Fraction, IntegralComponent};
use crate::graph::Graph;
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

use super::{axis_component, closure::drive_closure, AXES};

/// The 3-center electron-repulsion integral driver: one bra center, two ket
/// centers.
#[derive(Debug, Clone, Copy, Default)]
pub struct V3iEriDriver {
    config: DriverConfig,
}

impl V3iEriDriver {
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

    /// Horizontal recursion between the two ket centers along `axis`:
    /// `(a, CD| = (a, C+1,D-1| + CD (a, C-1|`, the same law as
    /// [`super::eri::EriDriver::ket_hrr`] with the sole bra center at index
    /// 0. Returns `None` if `C`'s exponent along `axis` is already zero.
    #[must_use]
    pub fn ket_hrr(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        let c = term.integral().ket().shape_at(0);
        if c.exponent(axis) == 0 {
            return None;
        }
        let c_down_d_up = term.integral().shift(axis, -1, 1)?.shift(axis, 1, 2)?;
        let term1 = RecursionTerm::new(c_down_d_up);

        let c_down = term.integral().shift(axis, -1, 1)?;
        let mut term2 = RecursionTerm::new(c_down);
        term2.add(Factor::vector("CD", axis_component(axis)), Fraction::from_int(-1));

        Some(RecursionExpansion::new(term.clone(), vec![term1, term2]))
    }

    /// Vertical recursion on the single bra center along `axis`: the `PA`
    /// and `WP` terms, plus a same-center `1/zeta`/`rho/zeta^2` pair once a
    /// second reduction is still possible, plus a cross term against ket
    /// center `D`'s exponent (mirroring
    /// [`super::eri::EriDriver::bra_vrr`], but with no second bra center so
    /// no `AB`-style same-center-pair factor arises). Returns `None` if the
    /// bra exponent along `axis` is already zero.
    #[must_use]
    pub fn bra_vrr(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        let a = term.integral().bra().shape_at(0);
        let n_a = a.exponent(axis);
        if n_a == 0 {
            return None;
        }
        let d = term.integral().ket().shape_at(1);

        let a_down = term.integral().shift(axis, -1, 0)?;

        let mut term_pa = RecursionTerm::new(a_down.clone());
        term_pa.add(Factor::vector("PA", axis_component(axis)), Fraction::from_int(1));

        let mut term_wp = RecursionTerm::new(a_down.shift_order(1)?);
        term_wp.add(Factor::vector("WP", axis_component(axis)), Fraction::from_int(1));

        let mut summands = vec![term_pa, term_wp];

        let n_a2 = n_a - 1;
        if n_a2 > 0 {
            let a_down2 = a_down.shift(axis, -1, 0)?;
            let mut term_1z = RecursionTerm::new(a_down2.clone());
            term_1z.add(Factor::scalar("1/zeta"), Fraction::new(n_a2, 2).ok()?);
            let mut term_rho = RecursionTerm::new(a_down2.shift_order(1)?);
            term_rho.add(Factor::scalar("rho/zeta^2"), Fraction::new(-n_a2, 2).ok()?);
            summands.push(term_1z);
            summands.push(term_rho);
        }

        let n_d = d.exponent(axis);
        if n_d > 0 {
            let cross = a_down.shift(axis, -1, 2)?.shift_order(1)?;
            let mut term_cross = RecursionTerm::new(cross);
            term_cross.add(Factor::scalar("1/(zeta+eta)"), Fraction::new(n_d, 2).ok()?);
            summands.push(term_cross);
        }

        Some(RecursionExpansion::new(term.clone(), summands))
    }

    /// Vertical recursion on ket center `D` along `axis`, symmetric to
    /// [`Self::bra_vrr`] with factors `QD`/`WQ`/`1/eta`/`rho/eta^2`, and a
    /// cross term against the lone bra center's exponent.
    #[must_use]
    pub fn ket_vrr(&self, term: &RecursionTerm, axis: char) -> Option<RecursionExpansion> {
        let d = term.integral().ket().shape_at(1);
        let n_d = d.exponent(axis);
        if n_d == 0 {
            return None;
        }
        let a = term.integral().bra().shape_at(0);

        let d_down = term.integral().shift(axis, -1, 2)?;

        let mut term_qd = RecursionTerm::new(d_down.clone());
        term_qd.add(Factor::vector("QD", axis_component(axis)), Fraction::from_int(1));

        let mut term_wq = RecursionTerm::new(d_down.shift_order(1)?);
        term_wq.add(Factor::vector("WQ", axis_component(axis)), Fraction::from_int(1));

        let mut summands = vec![term_qd, term_wq];

        let n_d2 = n_d - 1;
        if n_d2 > 0 {
            let d_down2 = d_down.shift(axis, -1, 2)?;
            let mut term_1e = RecursionTerm::new(d_down2.clone());
            term_1e.add(Factor::scalar("1/eta"), Fraction::new(n_d2, 2).ok()?);
            let mut term_rho = RecursionTerm::new(d_down2.shift_order(1)?);
            term_rho.add(Factor::scalar("rho/eta^2"), Fraction::new(-n_d2, 2).ok()?);
            summands.push(term_1e);
            summands.push(term_rho);
        }

        let n_a = a.exponent(axis);
        if n_a > 0 {
            let cross = d_down.shift(axis, -1, 0)?.shift_order(1)?;
            let mut term_cross = RecursionTerm::new(cross);
            term_cross.add(Factor::scalar("1/(zeta+eta)"), Fraction::new(n_a, 2).ok()?);
            summands.push(term_cross);
        }

        Some(RecursionExpansion::new(term.clone(), summands))
    }

    fn apply_over_axes<F>(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>, mut law: F) -> Option<RecursionExpansion>
    where
        F: FnMut(&Self, &RecursionTerm, char) -> Option<RecursionExpansion>,
    {
        for axis in AXES {
            if let Some(expansion) = law(self, term, axis) {
                for summand in expansion.summands() {
                    sints.insert(summand.integral().clone());
                }
                return Some(expansion);
            }
        }
        None
    }

    /// Tries [`Self::ket_hrr`] on each axis in turn.
    #[must_use]
    pub fn apply_ket_hrr(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        self.apply_over_axes(term, sints, Self::ket_hrr)
    }

    /// Tries [`Self::bra_vrr`] on each axis in turn.
    #[must_use]
    pub fn apply_bra_vrr(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        self.apply_over_axes(term, sints, Self::bra_vrr)
    }

    /// Tries [`Self::ket_vrr`] on each axis in turn.
    #[must_use]
    pub fn apply_ket_vrr(&self, term: &RecursionTerm, sints: &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion> {
        self.apply_over_axes(term, sints, Self::ket_vrr)
    }

    /// Drives [`Self::apply_ket_hrr`] to a fixed point over every root in
    /// `group`.
    #[must_use]
    pub fn apply_ket_hrr_for_group(&self, group: &RecursionGroup) -> Graph<RecursionGroup> {
        let seeds: Vec<IntegralComponent> = group.roots().into_iter().map(|t| t.integral().clone()).collect();
        drive_closure(&seeds, |term, sints| self.apply_ket_hrr(term, sints), self.config.budget())
    }

    /// Drives [`Self::apply_bra_vrr`] to a fixed point over every root in
    /// `group`.
    #[must_use]
    pub fn apply_bra_vrr_for_group(&self, group: &RecursionGroup) -> Graph<RecursionGroup> {
        let seeds: Vec<IntegralComponent> = group.roots().into_iter().map(|t| t.integral().clone()).collect();
        drive_closure(&seeds, |term, sints| self.apply_bra_vrr(term, sints), self.config.budget())
    }

    /// Drives [`Self::apply_ket_vrr`] to a fixed point over every root in
    /// `group`.
    #[must_use]
    pub fn apply_ket_vrr_for_group(&self, group: &RecursionGroup) -> Graph<RecursionGroup> {
        let seeds: Vec<IntegralComponent> = group.roots().into_iter().map(|t| t.integral().clone()).collect();
        drive_closure(&seeds, |term, sints| self.apply_ket_vrr(term, sints), self.config.budget())
    }
}
