#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "property-fuzz harness, not library code — panics on failure are the point"
)]
//! Randomized property tests over the invariants catalogued in the crate's
//! testable-properties section, matching the teacher's `src/tests/fuzz.rs`
//! convention: seed a `StdRng` from a fresh random `u64`, print that seed on
//! failure so a counterexample can be replayed.

use rand::{rngs::StdRng, RngExt, SeedableRng};

use crate::core::{Collector, Factor, Fraction, IntegralComponent, Operator, Tensor, TensorComponent};
use crate::graph::{Graph, IsSimilar};
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

const ROUNDS: usize = 200;

fn seeded_rng() -> (StdRng, u64) {
    let seed: u64 = rand::random();
    (StdRng::seed_from_u64(seed), seed)
}

fn random_component(rng: &mut StdRng, max_order: i32) -> TensorComponent {
    let ax = rng.random_range(0..=max_order);
    let ay = rng.random_range(0..=(max_order - ax));
    let az = max_order - ax - ay;
    TensorComponent::new(ax, ay, az)
}

fn scalar_integral(order: i32) -> IntegralComponent {
    let bra = Collector::one("GA", TensorComponent::scalar());
    let ket = Collector::one("GB", TensorComponent::scalar());
    let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
    IntegralComponent::new(bra, ket, integrand, order, vec![])
}

/// Invariant 1: `Tensor(n).components()` always has `(n+1)(n+2)/2` distinct
/// entries of order `n`, for every order a fuzzed run happens to try.
#[test]
#[allow(clippy::integer_division, reason = "(n+1)(n+2) is always even, so this division by 2 is exact")]
fn fuzz_tensor_component_closure() {
    let (mut rng, seed) = seeded_rng();
    for _ in 0..ROUNDS {
        let n = rng.random_range(0..=12);
        let components = Tensor::new(n).components();
        let expected = ((n + 1) * (n + 2) / 2) as usize;
        assert_eq!(components.len(), expected, "seed {seed}, order {n}");
        assert!(components.iter().all(|c| c.order() == n), "seed {seed}, order {n}");
        let mut dedup = components.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), components.len(), "seed {seed}, order {n}: duplicate component");
    }
}

/// Invariant 2: shifting a random component up then down along the same
/// axis is the identity whenever both shifts are defined.
#[test]
fn fuzz_shift_reversibility() {
    let (mut rng, seed) = seeded_rng();
    for _ in 0..ROUNDS {
        let order = rng.random_range(0..=8);
        let component = random_component(&mut rng, order);
        let axis = ['x', 'y', 'z'][rng.random_range(0..3)];
        if let Some(up) = component.shift(axis, 1) {
            assert_eq!(up.shift(axis, -1), Some(component), "seed {seed}, component {component:?}, axis {axis}");
        }
    }
}

/// Invariant 6: accumulating a random sequence of `(factor, multiplier)`
/// pairs into a term is a homomorphism — factor orders add, prefactors
/// multiply.
#[test]
fn fuzz_factor_accumulation_is_a_homomorphism() {
    let (mut rng, seed) = seeded_rng();
    let factor_names = ["1/zeta", "1/eta", "rho/zeta^2", "rho/eta^2"];
    for _ in 0..ROUNDS {
        let mut term = RecursionTerm::new(scalar_integral(0));
        let factor = Factor::scalar(factor_names[rng.random_range(0..factor_names.len())]);
        let steps = rng.random_range(1..=6);
        let mut expected_order = 0;
        let mut expected_prefactor = Fraction::from_int(1);
        for _ in 0..steps {
            let numerator = rng.random_range(-5..=5);
            let multiplier = Fraction::new(numerator.max(1), 1).expect("nonzero denominator");
            term.add(factor.clone(), multiplier);
            expected_order += 1;
            expected_prefactor = expected_prefactor * multiplier;
        }
        assert_eq!(term.factor_order(&factor), expected_order, "seed {seed}");
        assert_eq!(term.prefactor(), expected_prefactor, "seed {seed}");
    }
}

/// Invariant 8: reducing a group built from a random cluster of auxiliary
/// orders zeroes its minimum order and is idempotent.
#[test]
fn fuzz_reduce_idempotence() {
    let (mut rng, seed) = seeded_rng();
    for _ in 0..ROUNDS {
        let mut group = RecursionGroup::new();
        let base = rng.random_range(0..=20);
        let n_roots = rng.random_range(1..=5);
        for i in 0..n_roots {
            let root = RecursionTerm::new(scalar_integral(base + i));
            let summand = RecursionTerm::new(scalar_integral((base + i - 1).max(0)));
            group.insert(RecursionExpansion::new(root, vec![summand]));
        }
        let once = group.reduce();
        let twice = once.reduce();
        assert_eq!(once, twice, "seed {seed}: reduce is not idempotent");
        if !once.expansions().is_empty() {
            assert_eq!(once.min_order(), Some(0), "seed {seed}: reduce did not zero the minimum order");
        }
    }
}

/// Invariant 9: merging vertex `j` into vertex `i` in a randomly-shaped
/// graph absorbs `j`'s children into `i`'s, drops the `i -> j` self-edge,
/// and renumbers every reference to an index above `j` down by one.
#[test]
fn fuzz_merge_correctness() {
    let (mut rng, seed) = seeded_rng();
    for _ in 0..ROUNDS {
        let n_extra = rng.random_range(1..=5);
        let mut graph: Graph<RecursionGroup> = Graph::from_vertex(group_with_root(0));
        for k in 1..=n_extra {
            let parent = rng.random_range(0..k);
            graph.add(group_with_root(k.try_into().expect("small fuzz bound")), parent);
        }

        let order = graph.order();
        if order < 2 {
            continue;
        }
        let i = rng.random_range(0..order - 1);
        let j = rng.random_range(i + 1..order);

        let i_children_before: std::collections::BTreeSet<usize> = graph.children(i).expect("exists").clone();
        let j_children_before: std::collections::BTreeSet<usize> = graph.children(j).expect("exists").clone();

        graph.merge(i, j);
        assert_eq!(graph.order(), order - 1, "seed {seed}: merge must remove exactly one vertex");

        let remap = |k: usize| -> usize {
            match k.cmp(&j) {
                std::cmp::Ordering::Equal => i,
                std::cmp::Ordering::Greater => k - 1,
                std::cmp::Ordering::Less => k,
            }
        };
        let expected_children: std::collections::BTreeSet<usize> = i_children_before
            .iter()
            .chain(j_children_before.iter())
            .map(|&k| remap(k))
            .filter(|&k| k != i)
            .collect();
        assert_eq!(graph.children(i), Some(&expected_children), "seed {seed}: merged children mismatch");
    }
}

/// Invariant 11: after `Graph::reduce()`, no two remaining vertices are
/// `similar`, for graphs built from a random number of duplicate-order
/// clusters.
#[test]
fn fuzz_reduce_reaches_a_similarity_fixed_point() {
    let (mut rng, seed) = seeded_rng();
    for _ in 0..ROUNDS {
        let n_clusters = rng.random_range(1..=4);
        let mut graph: Graph<RecursionGroup> = Graph::from_vertex(group_with_root(0));
        for cluster in 0..n_clusters {
            let copies = rng.random_range(1..=3);
            for variant in 0..copies {
                // Same root order (so `similar` holds) but a distinct summand
                // per variant (so the vertices are genuinely unequal and
                // `Graph::add` cannot dedup them away before `reduce` runs).
                graph.add(group_variant(cluster, variant), 0);
            }
        }
        let reduced = graph.reduce();
        let order = reduced.order();
        for a in 0..order {
            for b in (a + 1)..order {
                let va = reduced.vertex(a).expect("in range");
                let vb = reduced.vertex(b).expect("in range");
                assert!(!va.similar(vb), "seed {seed}: reduce left similar vertices {a}, {b}");
            }
        }
    }
}

fn group_with_root(order: i32) -> RecursionGroup {
    let mut group = RecursionGroup::new();
    let root = RecursionTerm::new(scalar_integral(order));
    group.insert(RecursionExpansion::new(root, Vec::new()));
    group
}

/// Like [`group_with_root`], but `variant` selects a distinct summand order
/// so that two groups built from the same `order` but different `variant`s
/// are `similar` (same root arity and order) without being equal.
fn group_variant(order: i32, variant: i32) -> RecursionGroup {
    let mut group = RecursionGroup::new();
    let root = RecursionTerm::new(scalar_integral(order));
    let summand = RecursionTerm::new(scalar_integral(variant));
    group.insert(RecursionExpansion::new(root, vec![summand]));
    group
}
