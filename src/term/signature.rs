//! The canonical fingerprint of a recursion group.

use std::collections::BTreeSet;

use crate::core::{Factor, IntegralComponent};

/// Three sets capturing a group's shape up to renaming of the auxiliary
/// index: output integrals (roots after normalization), input integrals
/// (summand integrals after normalization), and touched factors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Signature {
    out_params: BTreeSet<IntegralComponent>,
    inp_params: BTreeSet<IntegralComponent>,
    factors: BTreeSet<Factor>,
}

impl Signature {
    /// Creates a signature from its three constituent sets.
    #[must_use]
    pub const fn new(
        out_params: BTreeSet<IntegralComponent>,
        inp_params: BTreeSet<IntegralComponent>,
        factors: BTreeSet<Factor>,
    ) -> Self {
        Self {
            out_params,
            inp_params,
            factors,
        }
    }

    /// Merges another signature's params and factors into this one.
    pub fn merge(&mut self, other: &Self) {
        self.out_params.extend(other.out_params.iter().cloned());
        self.inp_params.extend(other.inp_params.iter().cloned());
        self.factors.extend(other.factors.iter().cloned());
    }

    /// Number of distinct factors touched.
    #[must_use]
    pub fn nfactors(&self) -> usize {
        self.factors.len()
    }

    /// Number of parameters on the requested side (`"out"` or `"inp"`).
    #[must_use]
    pub fn nparams(&self, destination: &str) -> usize {
        match destination {
            "out" => self.out_params.len(),
            _ => self.inp_params.len(),
        }
    }

    /// The touched factors.
    #[must_use]
    pub const fn factors(&self) -> &BTreeSet<Factor> {
        &self.factors
    }

    /// The output (root) integrals.
    #[must_use]
    pub const fn out_params(&self) -> &BTreeSet<IntegralComponent> {
        &self.out_params
    }

    /// The input (summand) integrals.
    #[must_use]
    pub const fn inp_params(&self) -> &BTreeSet<IntegralComponent> {
        &self.inp_params
    }

    /// The base integral common to every output param, or `None` if the
    /// output params reduce (via [`IntegralComponent::base`]) to more than
    /// one distinct base — i.e. this signature's recursion pattern is not
    /// uniform over a single base integral.
    #[must_use]
    pub fn base(&self) -> Option<IntegralComponent> {
        let mut bases: BTreeSet<IntegralComponent> =
            self.out_params.iter().map(IntegralComponent::base).collect();
        if bases.len() == 1 {
            bases.pop_first()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, TensorComponent};

    fn integral(order: i32) -> IntegralComponent {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::one("GB", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        IntegralComponent::new(bra, ket, integrand, order, vec![])
    }

    #[test]
    fn base_is_none_when_out_params_disagree() {
        let sig = Signature::new(
            [integral(0), integral(1)].into_iter().collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        );
        assert_eq!(sig.base(), None);
    }

    #[test]
    fn base_is_uniform_base_when_out_params_agree() {
        let sig = Signature::new(
            [integral(2)].into_iter().collect(),
            BTreeSet::new(),
            BTreeSet::new(),
        );
        assert_eq!(sig.base(), Some(integral(2).base()));
    }

    #[test]
    fn merge_unions_every_set() {
        let mut a = Signature::new([integral(0)].into_iter().collect(), BTreeSet::new(), BTreeSet::new());
        let b = Signature::new([integral(1)].into_iter().collect(), [integral(2)].into_iter().collect(), BTreeSet::new());
        a.merge(&b);
        assert_eq!(a.nparams("out"), 2);
        assert_eq!(a.nparams("inp"), 1);
    }
}
