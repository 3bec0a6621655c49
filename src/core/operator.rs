//! Integrand and prefix operators: a name, a tensor shape, and a target
//! center description.

use std::sync::Arc;

use super::error::GenError;
use super::tensor::{Tensor, TensorComponent};

/// Where an operator acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// Acts on the bra collector.
    Bra,
    /// Acts on the ket collector.
    Ket,
    /// Acts on neither side (e.g. a bare Coulomb operator).
    None,
    /// Acts on the integral as a whole.
    SelfTarget,
}

impl Target {
    fn parse(s: &str) -> Result<Self, GenError> {
        match s {
            "bra" => Ok(Self::Bra),
            "ket" => Ok(Self::Ket),
            "none" => Ok(Self::None),
            "self" => Ok(Self::SelfTarget),
            other => Err(GenError::InvalidTarget(other.to_owned())),
        }
    }
}

/// An operator acting on an integral: the bare integrand (e.g. Coulomb
/// `1/|r-r'|`) or a prefix decoration (e.g. a geometric derivative).
///
/// Generic over the shape granularity `S`: `Operator<Tensor>` describes an
/// order-level operator, `Operator<TensorComponent>` ("`OperatorComponent`"
/// in the upstream naming) a concrete indexed one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operator<S> {
    name: Arc<str>,
    shape: S,
    target: Target,
    center: i32,
}

impl<S: Copy> Operator<S> {
    /// Creates a new operator.
    ///
    /// # Errors
    /// Returns [`GenError::InvalidTarget`] if `target` is not one of
    /// `"bra"`, `"ket"`, `"none"`, `"self"`.
    pub fn new(name: &str, shape: S, target: &str, center: i32) -> Result<Self, GenError> {
        Ok(Self {
            name: Arc::from(name),
            shape,
            target: Target::parse(target)?,
            center,
        })
    }

    /// Creates a targetless operator (`target = "none"`, `center = -1`),
    /// the default for bare integrands like Coulomb.
    #[must_use]
    pub fn untargeted(name: &str, shape: S) -> Self {
        Self {
            name: Arc::from(name),
            shape,
            target: Target::None,
            center: -1,
        }
    }

    /// The operator's name, e.g. `"1/|r-r'|"` or `"d/dR"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operator's tensor shape.
    #[must_use]
    pub const fn shape(&self) -> S {
        self.shape
    }

    /// Where this operator acts.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// The targeted center index, or `-1` if none.
    #[must_use]
    pub const fn center(&self) -> i32 {
        self.center
    }
}

impl Operator<Tensor> {
    /// Expands this order-level operator into one [`Operator<TensorComponent>`]
    /// per component of its shape.
    #[must_use]
    pub fn components(&self) -> Vec<Operator<TensorComponent>> {
        self.shape
            .components()
            .into_iter()
            .map(|shape| Operator {
                name: Arc::clone(&self.name),
                shape,
                target: self.target,
                center: self.center,
            })
            .collect()
    }
}

impl Operator<TensorComponent> {
    /// Returns this operator shifted by `delta` along `axis`, or `None` if
    /// the resulting exponent would be negative.
    #[must_use]
    pub fn shift(&self, axis: char, delta: i32) -> Option<Self> {
        let shape = self.shape.shift(axis, delta)?;
        Some(Self {
            name: Arc::clone(&self.name),
            shape,
            target: self.target,
            center: self.center,
        })
    }

    /// Whether this operator is a bare scalar (order 0) — used to decide
    /// whether a prefix operator should be dropped after shifting.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        self.shape.order() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_target() {
        let result = Operator::new("1/r", Tensor::new(0), "bogus", -1);
        assert_eq!(
            result,
            Err(GenError::InvalidTarget("bogus".to_owned()))
        );
    }

    #[test]
    fn components_expand_per_shape() {
        let op = Operator::new("d/dR", Tensor::new(1), "bra", 0).expect("valid target");
        assert_eq!(op.components().len(), 3);
    }

    #[test]
    fn shift_drops_below_zero() {
        let scalar = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        assert!(scalar.shift('x', -1).is_none());
    }
}
