//! Error types for the narrow set of genuinely fallible construction points.
//!
//! Most operations in this crate return `Option` rather than `Result`: a
//! driver that cannot reduce a component further, or a shift that would
//! produce a negative exponent, is not an error (see [`crate::core::integral`]
//! and the driver modules). `GenError` is reserved for construction-time
//! misuse at the input boundary.

use std::fmt;

/// Errors raised at the input boundary when a caller supplies a malformed
/// value that cannot be represented at all (as opposed to a shift or driver
/// step that simply has no predecessor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A [`crate::core::fraction::Fraction`] was constructed with a zero
    /// denominator.
    ZeroDenominator,
    /// An [`crate::core::operator::Operator`] was constructed with a
    /// `target` string outside `{"bra", "ket", "none", "self"}`.
    InvalidTarget(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDenominator => write!(f, "fraction denominator must not be zero"),
            Self::InvalidTarget(target) => {
                write!(
                    f,
                    "operator target '{target}' is not one of bra, ket, none, self"
                )
            }
        }
    }
}

impl std::error::Error for GenError {}
