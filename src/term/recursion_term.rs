//! A single term in a recursion expansion: an integral times a rational
//! prefactor and a multiset of named factors.

use std::collections::BTreeMap;

use crate::core::{Factor, Fraction, IntegralComponent};

/// One integral multiplied by a prefactor and a multiset of factors.
///
/// Invariants (upheld by construction): `factor_orders` never stores a
/// zero order (a factor with order 0 is simply absent from the map), and
/// `prefactor` is never the zero fraction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecursionTerm {
    integral: IntegralComponent,
    factor_orders: BTreeMap<Factor, i32>,
    prefactor: Fraction,
}

impl RecursionTerm {
    /// Creates a recursion term with prefactor 1 and no factors.
    #[must_use]
    pub fn new(integral: IntegralComponent) -> Self {
        Self {
            integral,
            factor_orders: BTreeMap::new(),
            prefactor: Fraction::from_int(1),
        }
    }

    /// Creates a recursion term with an explicit factor multiset and
    /// prefactor.
    #[must_use]
    pub fn with_factors(
        integral: IntegralComponent,
        factor_orders: BTreeMap<Factor, i32>,
        prefactor: Fraction,
    ) -> Self {
        Self {
            integral,
            factor_orders,
            prefactor,
        }
    }

    /// The integral this term scales.
    #[must_use]
    pub const fn integral(&self) -> &IntegralComponent {
        &self.integral
    }

    /// The rational prefactor.
    #[must_use]
    pub const fn prefactor(&self) -> Fraction {
        self.prefactor
    }

    /// The factor multiset.
    #[must_use]
    pub const fn map_of_factors(&self) -> &BTreeMap<Factor, i32> {
        &self.factor_orders
    }

    /// The order of a specific factor (0 if absent).
    #[must_use]
    pub fn factor_order(&self, factor: &Factor) -> i32 {
        self.factor_orders.get(factor).copied().unwrap_or(0)
    }

    /// Two terms are similar iff their integrals are similar (same
    /// tensor-component pattern, ignoring concrete exponents).
    #[must_use]
    pub fn similar(&self, other: &Self) -> bool {
        self.integral.bra().arity() == other.integral.bra().arity()
            && self.integral.ket().arity() == other.integral.ket().arity()
            && self.integral.order() == other.integral.order()
    }

    /// Two terms share the same base iff their integrals and factor
    /// multisets match; prefactors may differ.
    #[must_use]
    pub fn same_base(&self, other: &Self) -> bool {
        self.integral == other.integral && self.factor_orders == other.factor_orders
    }

    /// Sets the prefactor.
    pub fn set_prefactor(&mut self, factor: Fraction) {
        self.prefactor = factor;
    }

    /// Increments the stored order for `factor` (starting from 1 if
    /// absent) and multiplies the prefactor by `multiplier`.
    pub fn add(&mut self, factor: Factor, multiplier: Fraction) {
        *self.factor_orders.entry(factor).or_insert(0) += 1;
        self.prefactor = self.prefactor * multiplier;
    }

    /// Multiplies the prefactor by `multiplier` without touching factors.
    pub fn scale(&mut self, multiplier: Fraction) {
        self.prefactor = self.prefactor * multiplier;
    }

    /// Removes the named factor, if present.
    #[must_use]
    pub fn remove(&self, name: &str) -> Self {
        let factor_orders = self
            .factor_orders
            .iter()
            .filter(|(f, _)| f.name() != name)
            .map(|(f, v)| (f.clone(), *v))
            .collect();
        Self {
            integral: self.integral.clone(),
            factor_orders,
            prefactor: self.prefactor,
        }
    }

    /// Strips all prefixes from the underlying integral.
    #[must_use]
    pub fn clear_prefixes(&self) -> Self {
        Self {
            integral: self.integral.base(),
            ..self.clone()
        }
    }

    /// Whether this term is auxiliary at the given center: it carries no
    /// prefixes and the shape at `center` is the scalar.
    #[must_use]
    pub fn auxiliary(&self, center: usize) -> bool {
        if !self.integral.prefixes().is_empty() {
            return false;
        }
        let bra_arity = self.integral.bra().arity();
        if center < bra_arity {
            self.integral.bra().shape_at(center).order() == 0
        } else {
            self.integral.ket().shape_at(center - bra_arity).order() == 0
        }
    }

    /// Returns a copy of this term with the underlying integral shifted, or
    /// `None` if the shift is not applicable.
    #[must_use]
    pub fn shift(&self, axis: char, delta: i32, center: usize) -> Option<Self> {
        let integral = self.integral.shift(axis, delta, center)?;
        Some(Self {
            integral,
            ..self.clone()
        })
    }

    /// Returns a copy of this term with the underlying integral's auxiliary
    /// order shifted, or `None` if the shift is not applicable.
    #[must_use]
    pub fn shift_order(&self, delta: i32) -> Option<Self> {
        let integral = self.integral.shift_order(delta)?;
        Some(Self {
            integral,
            ..self.clone()
        })
    }

    /// Returns a copy of this term with the `index`-th prefix shifted, or
    /// `None` if the shift is not applicable.
    #[must_use]
    pub fn shift_prefix(&self, axis: char, delta: i32, index: usize, noscalar: bool) -> Option<Self> {
        let integral = self.integral.shift_prefix(axis, delta, index, noscalar)?;
        Some(Self {
            integral,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, TensorComponent};

    fn scalar_term() -> RecursionTerm {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::one("GB", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, 0, vec![]))
    }

    #[test]
    fn factor_accumulation_is_a_homomorphism() {
        let mut t = scalar_term();
        let f = Factor::scalar("1/zeta");
        t.add(f.clone(), Fraction::from_int(1));
        assert_eq!(t.factor_order(&f), 1);
        let before = t.prefactor();
        t.add(f.clone(), Fraction::new(3, 1).expect("valid"));
        assert_eq!(t.factor_order(&f), 2);
        assert_eq!(t.prefactor(), before * Fraction::new(3, 1).expect("valid"));
    }

    #[test]
    fn same_base_ignores_prefactor() {
        let mut a = scalar_term();
        let mut b = scalar_term();
        a.scale(Fraction::new(3, 2).expect("valid"));
        b.scale(Fraction::from_int(-1));
        assert!(a.same_base(&b));
    }
}
