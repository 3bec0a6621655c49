//! `Integral<S>` bundles a bra and ket collector, an integrand operator, an
//! auxiliary Obara-Saika order, and an ordered list of prefix operators.
//!
//! Generic over shape granularity `S`: `Integral<Tensor>` is the order-level
//! integral a caller seeds a driver with; `Integral<TensorComponent>`
//! (aliased [`IntegralComponent`]) is the fully indexed variant produced by
//! [`Integral::components`] and consumed by recursion terms.

use super::center::Collector;
use super::operator::Operator;
use super::shape::Shape;
use super::tensor::{Tensor, TensorComponent};

/// An integral identity: bra/ket collectors, integrand, auxiliary order,
/// and prefix operators.
///
/// Equality is structural; the derived `Ord` gives the lexicographic order
/// `(bra, ket, integrand, m, prefixes)` the spec requires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integral<S: Shape> {
    bra: Collector<S>,
    ket: Collector<S>,
    integrand: Operator<S>,
    /// Obara-Saika auxiliary order `m`.
    order: i32,
    prefixes: Vec<Operator<S>>,
}

impl<S: Shape> Integral<S> {
    /// Creates a new integral.
    #[must_use]
    pub fn new(
        bra: Collector<S>,
        ket: Collector<S>,
        integrand: Operator<S>,
        order: i32,
        prefixes: Vec<Operator<S>>,
    ) -> Self {
        Self {
            bra,
            ket,
            integrand,
            order,
            prefixes,
        }
    }

    /// The bra collector.
    #[must_use]
    pub const fn bra(&self) -> &Collector<S> {
        &self.bra
    }

    /// The ket collector.
    #[must_use]
    pub const fn ket(&self) -> &Collector<S> {
        &self.ket
    }

    /// The integrand operator.
    #[must_use]
    pub const fn integrand(&self) -> &Operator<S> {
        &self.integrand
    }

    /// The auxiliary Obara-Saika order `m`.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// The prefix operators, in application order.
    #[must_use]
    pub fn prefixes(&self) -> &[Operator<S>] {
        &self.prefixes
    }

    /// Per-prefix orders, e.g. `[1, 0, 0, 0]` for a first derivative on
    /// center A.
    #[must_use]
    pub fn prefixes_order(&self) -> Vec<i32> {
        self.prefixes.iter().map(|p| p.shape().order()).collect()
    }

    /// Number of bra + ket centers (2 for a two-electron-style bra/ket of
    /// one center each, up to 4 for a four-center ERI).
    #[must_use]
    pub fn centers(&self) -> usize {
        self.bra.arity() + self.ket.arity()
    }

    /// Same integral with all prefixes removed.
    #[must_use]
    pub fn base(&self) -> Self {
        Self {
            bra: self.bra.clone(),
            ket: self.ket.clone(),
            integrand: self.integrand.clone(),
            order: self.order,
            prefixes: Vec::new(),
        }
    }

    /// Whether this integral carries no prefix decorations.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Whether the integrand itself is a bare scalar operator.
    #[must_use]
    pub fn is_simple_integrand(&self) -> bool {
        self.integrand.shape().order() == 0
    }

    /// Removes all prefixes, but only if every prefix is already scalar;
    /// otherwise returns an unchanged clone. Mirrors the upstream
    /// `reduce_prefixes`, which is conservative: a non-scalar prefix still
    /// carries angular information that must not be silently dropped.
    #[must_use]
    pub fn reduce_prefixes(&self) -> Self {
        if self.prefixes.iter().all(|p| p.shape().order() == 0) {
            self.base()
        } else {
            self.clone()
        }
    }

    /// Returns the integral with auxiliary order shifted by `delta`, or
    /// `None` if the result would be negative.
    #[must_use]
    pub fn shift_order(&self, delta: i32) -> Option<Self> {
        let new_order = self.order + delta;
        if new_order < 0 {
            return None;
        }
        Some(Self {
            order: new_order,
            ..self.clone()
        })
    }
}

impl Integral<TensorComponent> {
    /// Shifts the angular exponent along `axis` by `delta` at the given
    /// center index (bra centers first, then ket centers), returning
    /// `None` if the result would be negative.
    #[must_use]
    pub fn shift(&self, axis: char, delta: i32, center: usize) -> Option<Self> {
        let bra_arity = self.bra.arity();
        if center < bra_arity {
            let shape = self.bra.shape_at(center).shift(axis, delta)?;
            Some(Self {
                bra: self.bra.with_shape_at(center, shape),
                ..self.clone()
            })
        } else {
            let ket_index = center - bra_arity;
            let shape = self.ket.shape_at(ket_index).shift(axis, delta)?;
            Some(Self {
                ket: self.ket.with_shape_at(ket_index, shape),
                ..self.clone()
            })
        }
    }

    /// Shifts the `index`-th prefix operator along `axis` by `delta`. If
    /// `noscalar` is set and the shifted prefix becomes scalar, it is
    /// dropped from the prefix list instead of retained. Returns `None` if
    /// `index` is out of range or the underlying shift fails.
    #[must_use]
    pub fn shift_prefix(&self, axis: char, delta: i32, index: usize, noscalar: bool) -> Option<Self> {
        let current = self.prefixes.get(index)?;
        let shifted = current.shift(axis, delta)?;
        let mut prefixes = self.prefixes.clone();
        if noscalar && shifted.is_scalar() {
            prefixes.remove(index);
        } else {
            prefixes[index] = shifted;
        }
        Some(Self {
            prefixes,
            ..self.clone()
        })
    }

    /// Shifts the integrand operator's own shape along `axis` by `delta`.
    #[must_use]
    pub fn shift_operator(&self, axis: char, delta: i32) -> Option<Self> {
        let integrand = self.integrand.shift(axis, delta)?;
        Some(Self {
            integrand,
            ..self.clone()
        })
    }

    /// Cosmetic label for this fully indexed integral: bra label + ket
    /// label (the corrected reading of the upstream typo that referenced
    /// undeclared `_bra_pair`/`_ket_pair` names instead of `_bra.label()`
    /// and `_ket.label()`), optionally including the auxiliary order.
    #[must_use]
    pub fn label(&self, use_order: bool) -> String {
        let mut s = String::new();
        collector_label(&self.bra, &mut s);
        s.push('_');
        collector_label(&self.ket, &mut s);
        if use_order && self.order != 0 {
            use std::fmt::Write as _;
            let _ = write!(s, "_m{}", self.order);
        }
        s
    }
}

fn collector_label(collector: &Collector<TensorComponent>, out: &mut String) {
    match collector {
        Collector::One { name, shape } => {
            out.push_str(name);
            out.push_str(&shape.label());
        }
        Collector::Two { names, shapes } => {
            out.push_str(&names[0]);
            out.push_str(&shapes[0].label());
            out.push_str(&names[1]);
            out.push_str(&shapes[1].label());
        }
    }
}

impl Integral<Tensor> {
    /// Full Cartesian-product expansion: every combination of bra
    /// components, ket components, integrand components, and per-prefix
    /// components.
    #[must_use]
    pub fn components(&self) -> Vec<Integral<TensorComponent>> {
        let bras = self.bra.components();
        let kets = self.ket.components();
        let integrands = self.integrand.components();
        let prefix_options: Vec<Vec<Operator<TensorComponent>>> =
            self.prefixes.iter().map(Operator::components).collect();

        let mut out = Vec::new();
        for bra in &bras {
            for ket in &kets {
                for integrand in &integrands {
                    for prefixes in cartesian(&prefix_options) {
                        out.push(Integral::new(
                            bra.clone(),
                            ket.clone(),
                            integrand.clone(),
                            self.order,
                            prefixes,
                        ));
                    }
                }
            }
        }
        out
    }

    /// Like [`Integral::components`], but pairs bra component `i` with ket
    /// component `i` only (requires bra and ket to expand to the same
    /// component count, e.g. when bra and ket shapes agree).
    #[must_use]
    pub fn diag_components(&self) -> Vec<Integral<TensorComponent>> {
        let bras = self.bra.components();
        let kets = self.ket.components();
        let integrands = self.integrand.components();
        let prefix_options: Vec<Vec<Operator<TensorComponent>>> =
            self.prefixes.iter().map(Operator::components).collect();

        let mut out = Vec::new();
        for (bra, ket) in bras.iter().zip(kets.iter()) {
            for integrand in &integrands {
                for prefixes in cartesian(&prefix_options) {
                    out.push(Integral::new(
                        bra.clone(),
                        ket.clone(),
                        integrand.clone(),
                        self.order,
                        prefixes,
                    ));
                }
            }
        }
        out
    }
}

/// Cartesian product of a list of option-lists, e.g. `[[a,b],[c,d]]` ->
/// `[[a,c],[a,d],[b,c],[b,d]]`. An empty outer list yields one empty
/// combination (no prefixes).
fn cartesian<T: Clone>(options: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut out = vec![Vec::new()];
    for opts in options {
        let mut next = Vec::with_capacity(out.len() * opts.len().max(1));
        for prefix in &out {
            for opt in opts {
                let mut combo = prefix.clone();
                combo.push(opt.clone());
                next.push(combo);
            }
        }
        out = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operator::Operator;

    fn coulomb(order: i32) -> Operator<Tensor> {
        Operator::untargeted("1/|r-r'|", Tensor::new(order))
    }

    #[test]
    fn component_expansion_size_matches_scenario_4() {
        // (p, d; s, f) Coulomb integral with two rank-1 prefixes: 3*6*1*10*3*3 = 1620
        let bra = Collector::two("GA", Tensor::new(1), "GB", Tensor::new(2));
        let ket = Collector::two("GC", Tensor::new(0), "GD", Tensor::new(3));
        let prefix = Operator::new("d/dR", Tensor::new(1), "bra", 0).expect("valid target");
        let integral = Integral::new(bra, ket, coulomb(0), 0, vec![prefix.clone(), prefix]);
        assert_eq!(integral.components().len(), 3 * 6 * 10 * 3 * 3);
    }

    #[test]
    fn base_strips_prefixes() {
        let bra = Collector::one("GC", Tensor::new(0));
        let ket = Collector::one("GD", Tensor::new(0));
        let prefix = Operator::new("d/dR", Tensor::new(1), "bra", 0).expect("valid target");
        let integral = Integral::new(bra, ket, coulomb(0), 0, vec![prefix]);
        assert!(integral.base().is_simple());
    }

    #[test]
    fn shift_order_rejects_negative() {
        let bra = Collector::one("GC", TensorComponent::scalar());
        let ket = Collector::one("GD", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        let integral = Integral::new(bra, ket, integrand, 0, vec![]);
        assert_eq!(integral.shift_order(-1), None);
        assert!(integral.shift_order(1).is_some());
    }
}
