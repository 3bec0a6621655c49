//! Layer 1: immutable algebra value types representing Cartesian
//! angular-momentum shapes and integral identities.

pub mod center;
pub mod error;
pub mod factor;
pub mod fraction;
pub mod integral;
pub mod operator;
pub mod shape;
pub mod tensor;

pub use center::Collector;
pub use error::GenError;
pub use factor::Factor;
pub use fraction::Fraction;
pub use integral::Integral;
pub use operator::{Operator, Target};
pub use shape::Shape;
pub use tensor::{Tensor, TensorComponent};

/// Order-level integral, as seeded by a caller before expansion.
pub type SeedIntegral = Integral<Tensor>;

/// Fully indexed integral, as produced by [`Integral::components`] and
/// consumed by recursion terms.
pub type IntegralComponent = Integral<TensorComponent>;
