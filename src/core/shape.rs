//! Common interface shared by the two shape granularities ([`Tensor`] and
//! [`TensorComponent`]) so that [`crate::core::operator::Operator`],
//! [`crate::core::center::Collector`], and [`crate::core::integral::Integral`]
//! can be written once, generic over `S`.

use super::tensor::{Tensor, TensorComponent};

/// A Cartesian angular-momentum shape with a well-defined total order.
pub trait Shape: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug {
    /// Total angular-momentum order of this shape.
    fn order(&self) -> i32;
}

impl Shape for Tensor {
    fn order(&self) -> i32 {
        Self::order(self)
    }
}

impl Shape for TensorComponent {
    fn order(&self) -> i32 {
        Self::order(self)
    }
}
