//! Layer 4: the generic recursion graph and the repository that collects
//! and deduplicates recursion groups across many seed integrals.
//!
//! [`Graph<V>`] is a direct Rust port of the upstream `Graph<T>` template
//! (`original_source/src/algebra/graph.hpp`): a vector of vertices plus,
//! per vertex, the set of child-vertex indices reachable by one recursion
//! step. Vertices are deduplicated by equality on insertion, never by
//! identity; merging, inverting, and reducing are all index-based
//! rewrites of that adjacency list.

pub mod repository;
pub mod traits;

pub use repository::{Repository, RepositorySummary};
pub use traits::{CanMerge, HasBase, HasSignature, IsSimilar};

use std::collections::{BTreeMap, BTreeSet};

use crate::core::Factor;
use crate::term::Signature;

/// A directed acyclic graph of recursion-group vertices.
///
/// Edges point from a parent (a group of integrals before a recursion
/// step) to its children (the groups the step expanded it into). There are
/// no cycles: every edge strictly reduces a recursion measure (invariant
/// 7), so a well-formed `Graph<V>` is always acyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<V> {
    vertices: Vec<V>,
    edges: Vec<BTreeSet<usize>>,
}

impl<V> Default for Graph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Graph<V> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Creates a single-vertex graph with no edges.
    #[must_use]
    pub fn from_vertex(vertex: V) -> Self {
        Self {
            vertices: vec![vertex],
            edges: vec![BTreeSet::new()],
        }
    }

    /// Every vertex, in insertion order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// The vertex at `index`, if any.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<&V> {
        self.vertices.get(index)
    }

    /// The child indices of the vertex at `index`, if any.
    #[must_use]
    pub fn children(&self, index: usize) -> Option<&BTreeSet<usize>> {
        self.edges.get(index)
    }

    /// Indices of vertices with no outgoing edges (terminal recursion
    /// groups: every root in them is a base integral).
    #[must_use]
    pub fn orphans(&self) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, children)| children.is_empty())
            .map(|(index, _)| index)
            .collect()
    }
}

impl<V: PartialEq> Graph<V> {
    fn index_of(&self, vertex: &V) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }

    /// Adds `vertex` as a child of the vertex at `root`, deduplicating
    /// `vertex` against existing vertices by equality (a linear scan,
    /// matching the upstream `add`): if an equal vertex already exists its
    /// index is reused, otherwise `vertex` is appended as a new one.
    ///
    /// # Panics
    /// Panics if `root >= self.order()`.
    pub fn add(&mut self, vertex: V, root: usize) {
        assert!(root < self.vertices.len(), "root index out of range");
        let index = self.index_of(&vertex).unwrap_or_else(|| {
            self.vertices.push(vertex);
            self.edges.push(BTreeSet::new());
            self.vertices.len() - 1
        });
        self.edges[root].insert(index);
    }

    /// Adds `vertex` as a child of whichever existing vertex equals `root`.
    /// A no-op if no vertex equals `root` (matching the upstream
    /// root-by-value overload of `add`).
    pub fn add_child_of(&mut self, vertex: V, root: &V) {
        if let Some(root_index) = self.index_of(root) {
            self.add(vertex, root_index);
        }
    }
}

impl<V: traits::CanMerge> Graph<V> {
    /// Merges vertex `j` into vertex `i` (`i < j`): `i`'s data absorbs
    /// `j`'s via [`CanMerge::merge`], `j` is removed, `j`'s children become
    /// `i`'s, the now-dangling self-edge `i -> j` is dropped, any `i -> i`
    /// self-loop this produces (from a back-edge `j -> i` renumbered onto
    /// `i`) is also dropped, and every remaining edge referencing an index
    /// above `j` is shifted down by one to account for the removal.
    ///
    /// # Panics
    /// Panics if `i >= j` or `j >= self.order()`.
    pub fn merge(&mut self, i: usize, j: usize) {
        assert!(i < j && j < self.vertices.len(), "merge requires i < j < order()");
        let absorbed = self.vertices.remove(j);
        self.vertices[i].merge(&absorbed);
        let absorbed_children = self.edges.remove(j);
        self.edges[i].extend(absorbed_children);
        self.edges[i].remove(&j);
        self.edges[i].remove(&i);
        for children in &mut self.edges {
            *children = children
                .iter()
                .map(|&k| match k.cmp(&j) {
                    std::cmp::Ordering::Equal => i,
                    std::cmp::Ordering::Greater => k - 1,
                    std::cmp::Ordering::Less => k,
                })
                .collect();
        }
    }
}

impl<V: traits::IsSimilar + traits::CanMerge + Clone> Graph<V> {
    /// Repeatedly merges the first pair of similar vertices found (by
    /// ascending `(i, j)`, restarting the scan after every merge) until no
    /// similar pair remains. Terminates because [`Self::merge`] strictly
    /// shrinks the vertex count.
    #[must_use]
    pub fn reduce(&self) -> Self {
        let mut reduced = self.clone();
        loop {
            let order = reduced.vertices.len();
            let mut found = None;
            'scan: for i in 0..order {
                for j in (i + 1)..order {
                    if reduced.vertices[i].similar(&reduced.vertices[j]) {
                        found = Some((i, j));
                        break 'scan;
                    }
                }
            }
            match found {
                Some((i, j)) => reduced.merge(i, j),
                None => return reduced,
            }
        }
    }
}

impl<V: Clone> Graph<V> {
    /// Reverses both vertex order and edge direction: the vertex at
    /// position `i` in the result is the vertex at `order() - 1 - i` in
    /// `self`, and every edge `parent -> child` becomes `child' ->
    /// parent'` under that same reindexing. An involution:
    /// `g.invert().invert() == g`.
    #[must_use]
    pub fn invert(&self) -> Self {
        let order = self.vertices.len();
        let mirror = |index: usize| order - 1 - index;
        let vertices = (0..order).map(|i| self.vertices[mirror(i)].clone()).collect();
        let mut edges = vec![BTreeSet::new(); order];
        for (parent, children) in self.edges.iter().enumerate() {
            for &child in children {
                edges[mirror(child)].insert(mirror(parent));
            }
        }
        Self { vertices, edges }
    }

    /// Sorts vertices by a projected key `U` (via [`traits::HasBase`]),
    /// remapping edges to match. Falls back to an unchanged clone (the
    /// upstream `sort`'s documented fallback) if any vertex has no base,
    /// or if the projection is not injective (two vertices share a base).
    #[must_use]
    pub fn sort<U: Ord + Clone>(&self) -> Self
    where
        V: traits::HasBase<U>,
    {
        let order = self.vertices.len();
        let mut keyed = Vec::with_capacity(order);
        let mut seen = BTreeSet::new();
        for (index, vertex) in self.vertices.iter().enumerate() {
            let Some(key) = vertex.base() else {
                return self.clone();
            };
            if !seen.insert(key.clone()) {
                return self.clone();
            }
            keyed.push((key, index));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut old_to_new = vec![0usize; order];
        for (new_index, (_, old_index)) in keyed.iter().enumerate() {
            old_to_new[*old_index] = new_index;
        }
        let vertices = keyed.iter().map(|(_, old_index)| self.vertices[*old_index].clone()).collect();
        let mut edges = vec![BTreeSet::new(); order];
        for (old_index, children) in self.edges.iter().enumerate() {
            edges[old_to_new[old_index]] = children.iter().map(|&child| old_to_new[child]).collect();
        }
        Self { vertices, edges }
    }
}

impl<V: traits::HasSignature> Graph<V> {
    /// Folds each vertex's [`Signature`] into a `signature -> vertex` map,
    /// keeping the first vertex seen for each distinct signature (matching
    /// the upstream `signatures<U>`'s insert-only `std::map::emplace`
    /// semantics).
    #[must_use]
    pub fn signatures(&self) -> BTreeMap<Signature, V>
    where
        V: Clone,
    {
        let mut map = BTreeMap::new();
        for vertex in &self.vertices {
            map.entry(vertex.signature()).or_insert_with(|| vertex.clone());
        }
        map
    }

    /// Merges every vertex's signature into one accumulator signature.
    #[must_use]
    pub fn global_signature(&self) -> Signature {
        let mut accumulator = Signature::default();
        for vertex in &self.vertices {
            accumulator.merge(&vertex.signature());
        }
        accumulator
    }

    /// Every distinct factor touched by any vertex.
    #[must_use]
    pub fn factors(&self) -> BTreeSet<Factor> {
        self.vertices.iter().flat_map(traits::HasSignature::factors).collect()
    }

    /// Aggregate factor occurrence counts across every vertex.
    #[must_use]
    pub fn map_of_factors(&self) -> BTreeMap<Factor, i32> {
        let mut out = BTreeMap::new();
        for vertex in &self.vertices {
            for (factor, order) in vertex.map_of_factors() {
                *out.entry(factor).or_insert(0) += order;
            }
        }
        out
    }
}
