//! The shared multi-level closure driver behind every `apply_*_for_group`
//! method.
//!
//! A single-term driver step reduces one [`RecursionTerm`] to an
//! expansion over smaller integrals (or reports it cannot, via `None`).
//! [`drive_closure`] batches a step function over a whole
//! [`RecursionGroup`], partitions the resulting summand integrals by
//! structural pattern (matching [`RecursionTerm::similar`]: same bra/ket
//! arity and auxiliary order), and recurses level by level until no new
//! vertex produces a further expansion, building the resulting
//! [`Graph<RecursionGroup>`].

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ClosureBudget;
use crate::core::IntegralComponent;
use crate::graph::Graph;
use crate::term::{RecursionExpansion, RecursionGroup, RecursionTerm};

/// The structural pattern a batch of same-level summand integrals is split
/// by before recursing one more level: bra/ket arity, auxiliary order, and
/// each center's own angular-momentum order. Coarser than full equality (two
/// integrals with different concrete Cartesian components still share a
/// key) but finer than [`RecursionTerm::similar`] — that predicate ignores
/// angular momentum entirely, which is right for merging already-built
/// vertices that follow the same recursion pattern ([`Graph::reduce`]), but
/// wrong here: two centers at different angular-momentum orders are
/// different recursion families (an `s` shell is already terminal; a `d`
/// shell still has angular momentum left to strip) and must route to
/// distinct child vertices, as scenario S4 requires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PatternKey {
    bra_arity: usize,
    ket_arity: usize,
    order: i32,
    center_orders: Vec<i32>,
}

impl PatternKey {
    fn of(integral: &IntegralComponent) -> Self {
        let bra = integral.bra();
        let ket = integral.ket();
        let center_orders = (0..bra.arity())
            .map(|i| bra.shape_at(i).order())
            .chain((0..ket.arity()).map(|i| ket.shape_at(i).order()))
            .collect();
        Self {
            bra_arity: bra.arity(),
            ket_arity: ket.arity(),
            order: integral.order(),
            center_orders,
        }
    }
}

/// Drives one level for a batch of integrals. An integral the step
/// function cannot reduce still gets a (terminal) expansion with no
/// summands, so the resulting vertex always exists — it simply ends up
/// with no outgoing edges, matching [`Graph::orphans`].
fn drive_group<F>(integrals: &[IntegralComponent], step: &mut F, sints: &mut BTreeSet<IntegralComponent>) -> RecursionGroup
where
    F: FnMut(&RecursionTerm, &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion>,
{
    let mut group = RecursionGroup::new();
    for integral in integrals {
        let term = RecursionTerm::new(integral.clone());
        let expansion = step(&term, sints).unwrap_or_else(|| RecursionExpansion::new(term.clone(), Vec::new()));
        group.insert(expansion);
    }
    group
}

/// Drives `step` to a fixed point starting from `seed_integrals`,
/// returning the resulting recursion graph. `step` is expected to be one
/// of a driver's `apply_*` single-term closures (already trying every
/// axis and inserting its own summands into `sints`).
pub(super) fn drive_closure<F>(seed_integrals: &[IntegralComponent], mut step: F, budget: ClosureBudget) -> Graph<RecursionGroup>
where
    F: FnMut(&RecursionTerm, &mut BTreeSet<IntegralComponent>) -> Option<RecursionExpansion>,
{
    let mut sints: BTreeSet<IntegralComponent> = seed_integrals.iter().cloned().collect();
    let seed_group = drive_group(seed_integrals, &mut step, &mut sints);
    let mut graph = Graph::from_vertex(seed_group);

    let mut frontier = vec![0usize];
    let mut iterations = 0usize;
    while let Some(parent_index) = frontier.pop() {
        iterations += 1;
        if iterations > budget.max_iterations() {
            break;
        }
        let parent = graph
            .vertex(parent_index)
            .expect("frontier only ever holds indices already present in the graph")
            .clone();

        let mut buckets: BTreeMap<PatternKey, Vec<IntegralComponent>> = BTreeMap::new();
        for expansion in parent.expansions() {
            for summand in expansion.summands() {
                let integral = summand.integral().clone();
                buckets.entry(PatternKey::of(&integral)).or_default().push(integral);
            }
        }

        for integrals in buckets.into_values() {
            let child = drive_group(&integrals, &mut step, &mut sints);
            graph.add(child.clone(), parent_index);
            if let Some(child_index) = graph.vertices().iter().position(|vertex| *vertex == child) {
                frontier.push(child_index);
            }
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Collector, Fraction, Operator, TensorComponent};

    fn scalar_integral(order: i32) -> IntegralComponent {
        let bra = Collector::one("GA", TensorComponent::scalar());
        let ket = Collector::one("GB", TensorComponent::scalar());
        let integrand = Operator::untargeted("1/|r-r'|", TensorComponent::scalar());
        IntegralComponent::new(bra, ket, integrand, order, vec![])
    }

    #[test]
    fn closure_terminates_when_step_always_fails() {
        let graph = drive_closure(&[scalar_integral(0)], |_, _| None, ClosureBudget::new());
        assert_eq!(graph.order(), 1);
        assert_eq!(graph.orphans(), vec![0]);
    }

    #[test]
    fn closure_chains_through_decreasing_order() {
        let graph = drive_closure(
            &[scalar_integral(2)],
            |term, sints| {
                let summand = term.integral().shift_order(-1)?;
                sints.insert(summand.clone());
                let mut summand_term = RecursionTerm::new(summand);
                summand_term.scale(Fraction::from_int(1));
                Some(RecursionExpansion::new(term.clone(), vec![summand_term]))
            },
            ClosureBudget::new(),
        );
        // order 2 -> order 1 -> order 0 -> terminal: three vertices.
        assert_eq!(graph.order(), 3);
        assert!(graph.orphans().len() == 1);
    }
}
