//! Layer 2: the symbolic recursion-term algebra — a term is an integral
//! multiplied by a rational prefactor and a multiset of named factors;
//! groups and signatures flatten collections of terms.

pub mod expansion;
pub mod group;
pub mod recursion_term;
pub mod signature;

pub use expansion::RecursionExpansion;
pub use group::RecursionGroup;
pub use recursion_term::RecursionTerm;
pub use signature::Signature;
