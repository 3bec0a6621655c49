//! Layer 3: recursion drivers.
//!
//! A driver implements one or more single-step recursion laws (`bra_hrr`,
//! `ket_hrr`, `bra_vrr`, `ket_vrr`, ...) over [`crate::term::RecursionTerm`],
//! plus the `apply_*` closures that drive those laws to a fixed point over
//! a [`crate::term::RecursionGroup`], producing a [`crate::graph::Graph`].
//! Each driver corresponds to one file in
//! `original_source/src/recursions/`.

mod closure;
mod ecp;
mod eri;
mod geom010;
mod geom100;
mod geom20;
mod v3i_eri;

pub use ecp::ProjectedEcpDriver;
pub use eri::EriDriver;
pub use geom010::Geom010EriDriver;
pub use geom100::Geom100EriDriver;
pub use geom20::Geom20EriDriver;
pub use v3i_eri::V3iEriDriver;

use crate::core::TensorComponent;

/// The three Cartesian axes, tried in this fixed order by every `apply_*`
/// closure when auto-selecting which axis a recursion step reduces.
pub(crate) const AXES: [char; 3] = ['x', 'y', 'z'];

/// The unit [`TensorComponent`] along `axis` (exponent 1 on that axis,
/// zero elsewhere), used to shape directional factors like `AB` or `PB`.
pub(crate) fn axis_component(axis: char) -> TensorComponent {
    TensorComponent::scalar()
        .shift(axis, 1)
        .expect("shifting the scalar component up by one is always valid")
}
