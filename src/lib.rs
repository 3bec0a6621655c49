#![forbid(unsafe_code)]
//! osrr: a symbolic recursion engine for molecular integral code generation.
//!
//! Offline generator core for electron-repulsion and one-electron integral
//! recursions used by quantum-chemistry codes. Given a seed integral
//! (angular-momentum orders, centers, an integrand), a [`driver`] expands it
//! one recursion step at a time — vertical recursion (VRR) down the
//! auxiliary Obara-Saika order, horizontal recursion (HRR) across bra/ket
//! centers — producing a [`term::RecursionExpansion`]. Driving a closure
//! over every reachable integral builds a [`graph::Graph`] of recursion
//! groups, which a [`graph::Repository`] collects and deduplicates by
//! [`term::Signature`].
//!
//! This crate produces the symbolic recursion graph only: it does not emit
//! target-language source text, parse a CLI, or evaluate anything
//! numerically. See each module's documentation for its place in the four
//! layers:
//!
//! - [`core`] — L1 algebra: tensors, centers, operators, integrals, factors.
//! - [`term`] — L2 symbolic terms: recursion terms, expansions, groups,
//!   signatures.
//! - [`driver`] — L3 recursion drivers: one type per recursion family.
//! - [`graph`] — L4 graph and repository.
//!
//! # Example
//! ```
//! use osrr::core::{Collector, Integral, Tensor};
//! use osrr::driver::EriDriver;
//!
//! let bra = Collector::two("GA", Tensor::new(1), "GB", Tensor::new(0));
//! let ket = Collector::two("GC", Tensor::new(0), "GD", Tensor::new(0));
//! let integrand = osrr::core::Operator::untargeted("1/|r-r'|", Tensor::new(0));
//! let seed = Integral::new(bra, ket, integrand, 0, vec![]);
//! let driver = EriDriver::new();
//! let mut sints = std::collections::BTreeSet::new();
//! for component in seed.components() {
//!     let term = osrr::term::RecursionTerm::new(component);
//!     if let Some(expansion) = driver.apply_bra_vrr(&term, &mut sints) {
//!         assert!(!expansion.summands().is_empty());
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod driver;
pub mod graph;
pub mod term;

pub use config::{ClosureBudget, DriverConfig};
pub use core::{Factor, Fraction, GenError, Integral, IntegralComponent, Operator, SeedIntegral};
pub use driver::{EriDriver, Geom010EriDriver, Geom100EriDriver, Geom20EriDriver, ProjectedEcpDriver, V3iEriDriver};
pub use graph::{Graph, Repository};
pub use term::{RecursionExpansion, RecursionGroup, RecursionTerm, Signature};

#[cfg(test)]
mod tests;
