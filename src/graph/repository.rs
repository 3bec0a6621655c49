//! The top-level collection of recursion graphs, deduplicated by signature.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::IntegralComponent;
use crate::term::Signature;

use super::traits::HasSignature;
use super::Graph;

/// A collection of [`Graph`]s together with the global map of unique
/// signature -> recursion-group data pairs across all of them.
///
/// Grounded in the upstream `Repository<T, U>`
/// (`original_source/src/algebra/repository.hpp`): a vector of graphs plus
/// a `std::map<Signature<U>, T>` built by merging each graph's own
/// `signatures<U>()` map in, keeping the first vertex seen for any given
/// signature across the whole repository (the upstream `std::map::merge`
/// transfers only non-conflicting keys, i.e. first-seen-wins, identical to
/// [`Graph::signatures`]'s own semantics).
#[derive(Debug, Clone)]
pub struct Repository<V> {
    graphs: Vec<Graph<V>>,
    by_signature: BTreeMap<Signature, V>,
}

impl<V> Default for Repository<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Repository<V> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graphs: Vec::new(),
            by_signature: BTreeMap::new(),
        }
    }

    /// The graphs held by this repository.
    #[must_use]
    pub fn graphs(&self) -> &[Graph<V>] {
        &self.graphs
    }

    /// The global signature -> vertex map.
    #[must_use]
    pub const fn by_signature(&self) -> &BTreeMap<Signature, V> {
        &self.by_signature
    }

    /// Number of recursion groups across every graph in this repository
    /// (the sum of each graph's vertex count).
    #[must_use]
    pub fn rec_groups(&self) -> usize {
        self.graphs.iter().map(Graph::order).sum()
    }

    /// A snapshot summary of this repository's size.
    #[must_use]
    pub fn summary(&self) -> RepositorySummary {
        RepositorySummary {
            num_graphs: self.graphs.len(),
            num_rec_groups: self.rec_groups(),
            num_signatures: self.by_signature.len(),
        }
    }
}

impl<V: HasSignature + Clone> Repository<V> {
    /// Adds a batch of graphs, folding each one's signatures into the
    /// global map (first-seen-wins on signature collisions).
    pub fn add(&mut self, graphs: impl IntoIterator<Item = Graph<V>>) {
        for graph in graphs {
            for (signature, vertex) in graph.signatures() {
                self.by_signature.entry(signature).or_insert(vertex);
            }
            self.graphs.push(graph);
        }
    }

    /// The set of distinct base integrals whose recursion pattern is
    /// uniform (every signature whose output params reduce to one base
    /// integral contributes that integral; non-uniform signatures are
    /// skipped, matching [`Signature::base`]'s fallible projection).
    #[must_use]
    pub fn base_integrals(&self) -> std::collections::BTreeSet<IntegralComponent> {
        self.by_signature.keys().filter_map(Signature::base).collect()
    }

    /// Every signature whose base integral equals `base`, with its
    /// associated vertex.
    #[must_use]
    pub fn base_map(&self, base: &IntegralComponent) -> BTreeMap<Signature, V> {
        self.by_signature
            .iter()
            .filter(|(signature, _)| signature.base().as_ref() == Some(base))
            .map(|(signature, vertex)| (signature.clone(), vertex.clone()))
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<V: HasSignature + Clone + Send> Repository<V> {
    /// Builds one [`Graph`] per item in `seeds` concurrently (via `rayon`'s
    /// work-stealing pool), then folds every resulting graph into a fresh
    /// repository in seed order.
    ///
    /// Grounded in the teacher's own optional `rayon` "parallel" feature
    /// (`Cargo.toml`): since every [`Graph`] and recursion-group value in
    /// this crate is an owned, `Send + Sync` plain value with no interior
    /// mutability, building the graph for one seed (e.g. one
    /// angular-momentum tuple) touches no state shared with any other
    /// seed's build, so the independent builds may run on separate threads
    /// with no synchronization beyond collecting their results.
    pub fn build_parallel<T, F>(seeds: &[T], build: F) -> Self
    where
        T: Sync,
        F: Fn(&T) -> Graph<V> + Sync,
    {
        use rayon::prelude::*;

        let graphs: Vec<Graph<V>> = seeds.par_iter().map(build).collect();
        let mut repository = Self::new();
        repository.add(graphs);
        repository
    }
}

/// A snapshot count of a [`Repository`]'s contents, matching the three
/// lines the upstream `Repository::summary()` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositorySummary {
    num_graphs: usize,
    num_rec_groups: usize,
    num_signatures: usize,
}

impl RepositorySummary {
    /// Number of top-level recursion graphs.
    #[must_use]
    pub const fn num_graphs(&self) -> usize {
        self.num_graphs
    }

    /// Total number of recursion groups (vertices) across all graphs.
    #[must_use]
    pub const fn num_rec_groups(&self) -> usize {
        self.num_rec_groups
    }

    /// Number of unique signatures in the global map.
    #[must_use]
    pub const fn num_signatures(&self) -> usize {
        self.num_signatures
    }
}

impl fmt::Display for RepositorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Recursion Graphs  : {}", self.num_graphs)?;
        writeln!(f, "Number of Recursion Groups  : {}", self.num_rec_groups)?;
        write!(f, "Number of Unique Signatures : {}", self.num_signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Operator, TensorComponent};
    use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

    fn term(order: i32) -> RecursionTerm {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::one("GB", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        RecursionTerm::new(IntegralComponent::new(bra, ket, integrand, order, vec![]))
    }

    fn group(order: i32) -> RecursionGroup {
        let mut group = RecursionGroup::new();
        group.insert(RecursionExpansion::new(term(order), vec![term(order - 1)]));
        group
    }

    #[test]
    fn add_deduplicates_signatures_first_seen_wins() {
        let mut repo: Repository<RecursionGroup> = Repository::new();
        repo.add([Graph::from_vertex(group(2))]);
        repo.add([Graph::from_vertex(group(2))]);
        assert_eq!(repo.summary().num_graphs(), 2);
        assert_eq!(repo.by_signature().len(), 1);
    }

    #[test]
    fn rec_groups_sums_every_graph_order() {
        let mut repo: Repository<RecursionGroup> = Repository::new();
        let mut g = Graph::from_vertex(group(2));
        g.add(group(1), 0);
        repo.add([g, Graph::from_vertex(group(5))]);
        assert_eq!(repo.rec_groups(), 3);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn build_parallel_matches_sequential_add() {
        let shells = [1, 2, 3, 4];
        let repo = Repository::build_parallel(&shells, |&order| Graph::from_vertex(group(order)));

        let mut sequential: Repository<RecursionGroup> = Repository::new();
        sequential.add(shells.iter().map(|&order| Graph::from_vertex(group(order))));

        assert_eq!(repo.summary(), sequential.summary());
    }
}
