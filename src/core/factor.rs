//! Symbolic coefficients attached to recursion terms: exponent-derived
//! factors (`1/zeta`, `rho/zeta^2`, ...) and inter-center distance vectors
//! (`AB`, `PB`, `WP`, ...).

use std::sync::Arc;

use super::tensor::TensorComponent;

/// A named symbolic factor, optionally shaped by a [`TensorComponent`] when
/// it is a vector quantity like `(P-B)_x`.
///
/// Two factors are equal iff `name`, `label`, and `shape` all agree.
///
/// The upstream C++ source's `operator<` has a known bug: its first
/// comparison branch returns `_shape < other._shape` where `_label <
/// other._label` was clearly intended (both branches end up comparing
/// `_shape`, so `_label` is never actually used to order factors). This
/// type implements the corrected, intended ordering `(name, label, shape)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factor {
    name: Arc<str>,
    label: Arc<str>,
    shape: Option<TensorComponent>,
}

impl Factor {
    /// Creates a scalar factor (no directional shape), e.g. `1/zeta`.
    #[must_use]
    pub fn scalar(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            label: Arc::from(name),
            shape: None,
        }
    }

    /// Creates a directional (vector) factor shaped by a tensor component,
    /// e.g. `AB` shifted along `x` for `(P-B)_x`.
    #[must_use]
    pub fn vector(name: &str, shape: TensorComponent) -> Self {
        let label = if shape.order() > 0 {
            format!("{name}_{}", shape.label())
        } else {
            name.to_owned()
        };
        Self {
            name: Arc::from(name),
            label: Arc::from(label.as_str()),
            shape: Some(shape),
        }
    }

    /// The bare name, e.g. `"AB"` or `"1/zeta"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cosmetic label, including axis suffix for shaped factors.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The optional directional shape.
    #[must_use]
    pub const fn shape(&self) -> Option<TensorComponent> {
        self.shape
    }
}

impl PartialOrd for Factor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Factor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.name.as_ref(), self.label.as_ref(), self.shape).cmp(&(
            other.name.as_ref(),
            other.label.as_ref(),
            other.shape,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_name_label_and_shape() {
        let a = Factor::vector("AB", TensorComponent::new(1, 0, 0));
        let b = Factor::vector("AB", TensorComponent::new(1, 0, 0));
        let c = Factor::vector("AB", TensorComponent::new(0, 1, 0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ordering_uses_name_then_label_then_shape() {
        let one_over_zeta = Factor::scalar("1/zeta");
        let ab_x = Factor::vector("AB", TensorComponent::new(1, 0, 0));
        assert!(ab_x < one_over_zeta);
    }

    #[test]
    fn scalar_factor_label_has_no_axis_suffix() {
        let f = Factor::scalar("1/(zeta+eta)");
        assert_eq!(f.label(), "1/(zeta+eta)");
    }

    #[test]
    fn shaped_label_includes_axis_suffix() {
        let f = Factor::vector("PB", TensorComponent::new(0, 0, 1));
        assert_eq!(f.label(), "PB_z");
    }
}
