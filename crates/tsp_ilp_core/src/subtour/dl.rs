//! Desrochers-Laporte subtour elimination.
//!
//! The MTZ rank skeleton with lifted coefficients: the reverse arc also
//! tightens each rank-step row, and every rank variable gets bounds that
//! depend on its depot arcs and degree terms instead of the loose
//! `[1, n-1]` box. Same O(n^2) constraint count as MTZ with a provably
//! stronger relaxation.
//!
//! Reference: Desrochers, Laporte. Improvements and extensions to the
//! Miller-Tucker-Zemlin subtour elimination constraints. Operations
//! Research Letters 10, pp. 27-36, 1991.

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
    let lift = n as f64 - 3.0;

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
            rank_step.add(x.var(j, i), lift);
            model.add_constraint(rank_step, Relation::Le, n as f64 - 2.0);
        }
    }

    for i in 1..n {
        // u[i] >= 1 + (n-3) x[i][0] + sum_j x[j][i]
        let mut lower = LinExpr::term(u[i], 1.0);
        lower.add(x.var(i, 0), -lift);
        for j in 1..n {
            if j != i {
                lower.add(x.var(j, i), -1.0);
            }
        }
        model.add_constraint(lower, Relation::Ge, 1.0);

        // u[i] <= n - 1 - (n-3) x[0][i] - sum_j x[i][j]
        let mut upper = LinExpr::term(u[i], 1.0);
        upper.add(x.var(0, i), lift);
        for j in 1..n {
            if j != i {
                upper.add(x.var(i, j), 1.0);
            }
        }
        model.add_constraint(upper, Relation::Le, n as f64 - 1.0);
    }

    model.add_constraint(LinExpr::term(u[0], 1.0), Relation::Eq, 0.0);

    log::debug!("dl: n={n} constraints_now={}", model.num_constraints());
    Ok(())
}
