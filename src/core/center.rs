//! Named Gaussian-center collectors: a single center (`OneCenter`, e.g. a
//! nuclear-attraction bra) or an ordered pair of centers (`TwoCenterPair`,
//! e.g. the bra of a four-center ERI). Both are folded into one generic
//! [`Collector`] with the arity carried as an enum variant, per the
//! single-type-parameter simplification documented in DESIGN.md.

use std::sync::Arc;

use super::tensor::{Tensor, TensorComponent};

/// A bra or ket collector: one named center, or two.
///
/// Generic over shape granularity `S` exactly like [`super::operator::Operator`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collector<S> {
    /// A single named center with a tensor shape (`OneCenter` upstream).
    One {
        /// Center name, e.g. `"GC"`.
        name: Arc<str>,
        /// Angular shape at this center.
        shape: S,
    },
    /// An ordered pair of named centers (`TwoCenterPair` upstream).
    Two {
        /// Center names, e.g. `["GA", "GB"]`.
        names: [Arc<str>; 2],
        /// Angular shapes, positionally matched to `names`.
        shapes: [S; 2],
    },
}

impl<S: Copy> Collector<S> {
    /// Creates a one-center collector.
    #[must_use]
    pub fn one(name: &str, shape: S) -> Self {
        Self::One {
            name: Arc::from(name),
            shape,
        }
    }

    /// Creates a two-center collector.
    #[must_use]
    pub fn two(name_a: &str, shape_a: S, name_b: &str, shape_b: S) -> Self {
        Self::Two {
            names: [Arc::from(name_a), Arc::from(name_b)],
            shapes: [shape_a, shape_b],
        }
    }

    /// Number of centers held by this collector: 1 or 2.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::One { .. } => 1,
            Self::Two { .. } => 2,
        }
    }

    /// The shape at the given center index (0-based).
    ///
    /// # Panics
    /// Panics if `index >= self.arity()`: a precondition violation per the
    /// error-handling design (§7) — callers never index past `arity()`.
    #[must_use]
    #[expect(clippy::panic, reason = "documented precondition violation, see § 7")]
    pub fn shape_at(&self, index: usize) -> S {
        match (self, index) {
            (Self::One { shape, .. }, 0) => *shape,
            (Self::Two { shapes, .. }, i @ (0 | 1)) => shapes[i],
            _ => panic!("center index {index} out of range for collector arity"),
        }
    }

    /// The name at the given center index.
    ///
    /// # Panics
    /// Panics if `index >= self.arity()`: a precondition violation per the
    /// error-handling design (§7) — callers never index past `arity()`.
    #[must_use]
    #[expect(clippy::panic, reason = "documented precondition violation, see § 7")]
    pub fn name_at(&self, index: usize) -> Arc<str> {
        match (self, index) {
            (Self::One { name, .. }, 0) => Arc::clone(name),
            (Self::Two { names, .. }, i @ (0 | 1)) => Arc::clone(&names[i]),
            _ => panic!("center index {index} out of range for collector arity"),
        }
    }

    /// Returns a copy of this collector with the shape at `index` replaced.
    #[must_use]
    pub fn with_shape_at(&self, index: usize, new_shape: S) -> Self {
        match self {
            Self::One { name, .. } => Self::One {
                name: Arc::clone(name),
                shape: new_shape,
            },
            Self::Two { names, shapes } => {
                let mut shapes = *shapes;
                shapes[index] = new_shape;
                Self::Two {
                    names: names.clone(),
                    shapes,
                }
            }
        }
    }
}

impl Collector<Tensor> {
    /// Cartesian product of the per-center component expansions.
    #[must_use]
    pub fn components(&self) -> Vec<Collector<TensorComponent>> {
        match self {
            Self::One { name, shape } => shape
                .components()
                .into_iter()
                .map(|c| Collector::one(name, c))
                .collect(),
            Self::Two { names, shapes } => {
                let mut out = Vec::new();
                for ca in shapes[0].components() {
                    for cb in shapes[1].components() {
                        out.push(Collector::two(&names[0], ca, &names[1], cb));
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_center_components_is_cartesian_product() {
        let pair = Collector::two("GA", Tensor::new(1), "GB", Tensor::new(2));
        assert_eq!(pair.components().len(), 3 * 6);
    }

    #[test]
    fn one_center_components_matches_tensor() {
        let one = Collector::one("GC", Tensor::new(2));
        assert_eq!(one.components().len(), 6);
    }
}
