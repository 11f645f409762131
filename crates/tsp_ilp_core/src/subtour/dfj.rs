//! Dantzig-Fulkerson-Johnson subtour elimination.
//!
//! One cut per subset `S` of the non-depot locations, `2 <= |S| <= n-2`:
//! the arcs inside `S` cannot form a cycle confined to it. Size `n-1` is
//! already implied by the degree constraints and is skipped. All cuts are
//! added eagerly, which bounds usable instance sizes to roughly n <= 20;
//! generation progress is logged because the count grows combinatorially.
//!
//! Reference: Dantzig, Fulkerson, Johnson. Solution of a large-scale
//! traveling-salesman problem. Operations Research 2, pp. 393-410, 1954.

use itertools::Itertools;

use crate::{
    ArcVariables, Result, WeightedDigraph,
    milp::{LinExpr, MilpModel, Relation},
};

const PROGRESS_REPORTS: u64 = 20;

pub(crate) fn add_constraints(
    graph: &WeightedDigraph,
    model: &mut MilpModel,
    x: &ArcVariables,
) -> Result<()> {
    let n = graph.n();
    let total = expected_cut_count(n);
    if total == 0 {
        log::info!("cuts: none needed for n={n}");
        return Ok(());
    }

    let progress_step = (total / PROGRESS_REPORTS).max(1);
    let mut count: u64 = 0;

    for r in 2..=(n - 2) {
        for subset in (1..n).combinations(r) {
            let mut inner_arcs = LinExpr::new();
            for &i in &subset {
                for &j in &subset {
                    if i != j {
                        inner_arcs.add(x.var(i, j), 1.0);
                    }
                }
            }
            model.add_constraint(inner_arcs, Relation::Le, (subset.len() - 1) as f64);

            count += 1;
            if count % progress_step == 0 || count == total {
                log::info!(
                    "cuts: {count} of {total} ({:.1}%) created",
                    100.0 * count as f64 / total as f64
                );
            }
        }
    }

    Ok(())
}

/// Number of DFJ cuts for an `n`-location instance:
/// `sum over r in 2..=n-2 of C(n-1, r)`.
pub fn expected_cut_count(n: usize) -> u64 {
    if n < 4 {
        return 0;
    }
    (2..=(n - 2)).map(|r| binomial(n - 1, r)).sum()
}

fn binomial(n: usize, r: usize) -> u64 {
    let r = r.min(n - r);
    let mut result: u128 = 1;
    for k in 0..r {
        result = result * (n - k) as u128 / (k + 1) as u128;
    }
    result as u64
}

#[cfg(test)]
mod tests {
    use super::{binomial, expected_cut_count};
    use crate::{SubtourStrategy, build_assignment_model, subtour::tests::square_graph};

    #[test]
    fn binomial_matches_pascal_triangle() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(7, 0), 1);
        assert_eq!(binomial(7, 7), 1);
        assert_eq!(binomial(10, 3), 120);
    }

    #[test]
    fn cut_count_follows_the_subset_formula() {
        // n=4: C(3,2) = 3; n=5: C(4,2) + C(4,3) = 10; n=6: C(5,2)+C(5,3)+C(5,4) = 25
        assert_eq!(expected_cut_count(4), 3);
        assert_eq!(expected_cut_count(5), 10);
        assert_eq!(expected_cut_count(6), 25);
    }

    #[test]
    fn tiny_instances_need_no_cuts() {
        assert_eq!(expected_cut_count(2), 0);
        assert_eq!(expected_cut_count(3), 0);
    }

    #[test]
    fn added_cut_count_matches_the_formula() {
        let graph = square_graph();
        let (mut model, x) = build_assignment_model(&graph).expect("build model");
        let base = model.num_constraints();

        SubtourStrategy::Dfj
            .add_constraints(&graph, &mut model, &x)
            .expect("add constraints");

        assert_eq!(
            model.num_constraints() - base,
            expected_cut_count(graph.n()) as usize
        );
    }
}
