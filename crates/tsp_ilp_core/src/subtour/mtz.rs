//! Miller-Tucker-Zemlin subtour elimination.
//!
//! One continuous rank variable per location, depot fixed at rank 0. Using
//! arc `(i, j)` forces `u[j] >= u[i] + 1`, so rank strictly increases along
//! any arc avoiding the depot, which no closed sub-cycle can satisfy. When
//! the arc is unused the big-M term relaxes the row to a no-op. O(n^2)
//! constraints, looser relaxation than the cut family.
//!
//! Reference: Miller, Tucker, Zemlin. Integer programming formulations and
//! traveling salesman problems. Journal of the ACM 7, pp. 326-329, 1960.

use crate::{
    ArcVariables, Result, WeightedDigraph,
    milp::{LinExpr, MilpModel, Relation, VarId},
};

pub(crate) fn add_constraints(
    graph: &WeightedDigraph,
    model: &mut MilpModel,
    x: &ArcVariables,
) -> Result<()> {
    let n = graph.n();
    let big_m = n as f64 - 1.0;

    let u: Vec<VarId> = (0..n)
        .map(|_| model.add_continuous_var(0.0, f64::INFINITY))
        .collect();

    for i in 1..n {
        for j in 1..n {
            if i == j {
                continue;
            }
            let mut rank_step = LinExpr::term(u[i], 1.0);
            rank_step.add(u[j], -1.0);
            rank_step.add(x.var(i, j), big_m);
            model.add_constraint(rank_step, Relation::Le, n as f64 - 2.0);
        }
    }

    for &ui in &u[1..] {
        model.add_constraint(LinExpr::term(ui, 1.0), Relation::Ge, 1.0);
        model.add_constraint(LinExpr::term(ui, 1.0), Relation::Le, n as f64 - 1.0);
    }

    model.add_constraint(LinExpr::term(u[0], 1.0), Relation::Eq, 0.0);

    log::debug!("mtz: n={n} constraints_now={}", model.num_constraints());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{SubtourStrategy, build_assignment_model, subtour::tests::square_graph};

    #[test]
    fn adds_rank_vars_and_quadratic_constraint_count() {
        let graph = square_graph();
        let (mut model, x) = build_assignment_model(&graph).expect("build model");
        let base_vars = model.num_vars();
        let base_constraints = model.num_constraints();

        SubtourStrategy::Mtz
            .add_constraints(&graph, &mut model, &x)
            .expect("add constraints");

        let n = graph.n();
        assert_eq!(model.num_vars() - base_vars, n);
        // (n-1)(n-2) rank-step rows + 2(n-1) bounds + depot fix
        assert_eq!(
            model.num_constraints() - base_constraints,
            (n - 1) * (n - 2) + 2 * (n - 1) + 1
        );
    }
}
