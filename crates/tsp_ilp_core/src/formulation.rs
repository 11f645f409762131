//! Arc-selection variable fabric and the formulation-independent
//! assignment constraints.

use crate::{
    Error, Result, WeightedDigraph,
    milp::{Direction, LinExpr, MilpModel, Relation, VarId},
};

const MIN_FORMULATION_NODES: usize = 2;

/// Dense `n x n` matrix of binary arc-selection variables: `var(i, j)` is 1
/// when the tour travels from location index `i` to location index `j`.
#[derive(Clone, Debug)]
pub struct ArcVariables {
    n: usize,
    vars: Vec<VarId>,
}

impl ArcVariables {
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn var(&self, i: usize, j: usize) -> VarId {
        self.vars[i * self.n + j]
    }
}

/// Creates the arc variables, the minimization objective, and the 3n common
/// constraints every TSP formulation shares: no self-loops, one outgoing and
/// one incoming arc per location.
///
/// These alone admit disjoint unions of sub-cycles; a
/// [`SubtourStrategy`](crate::SubtourStrategy) must be applied on top.
pub fn build_assignment_model(graph: &WeightedDigraph) -> Result<(MilpModel, ArcVariables)> {
    let n = graph.n();
    if n < MIN_FORMULATION_NODES {
        return Err(Error::invalid_input(format!(
            "cannot formulate a tour over {n} locations"
        )));
    }

    let mut model = MilpModel::new();
    let vars: Vec<VarId> = (0..n * n).map(|_| model.add_binary_var()).collect();
    let x = ArcVariables { n, vars };

    let mut objective = LinExpr::new();
    for i in 0..n {
        for j in 0..n {
            if i != j {
                objective.add(x.var(i, j), graph.weight(i, j));
            }
        }
    }
    model.set_objective(objective, Direction::Minimize);

    for i in 0..n {
        let mut arcs_in = LinExpr::new();
        let mut arcs_out = LinExpr::new();
        for j in 0..n {
            arcs_in.add(x.var(j, i), 1.0);
            arcs_out.add(x.var(i, j), 1.0);
        }

        model.add_constraint(LinExpr::term(x.var(i, i), 1.0), Relation::Eq, 0.0);
        model.add_constraint(arcs_in, Relation::Eq, 1.0);
        model.add_constraint(arcs_out, Relation::Eq, 1.0);
    }

    log::debug!(
        "formulation: n={n} vars={} constraints={}",
        model.num_vars(),
        model.num_constraints()
    );

    Ok((model, x))
}

#[cfg(test)]
mod tests {
    use super::build_assignment_model;
    use crate::WeightedDigraph;

    fn ring_graph(n: usize) -> WeightedDigraph {
        let weights = (0..n * n)
            .map(|flat| if flat / n == flat % n { 0.0 } else { 1.0 })
            .collect();
        WeightedDigraph::from_weights((1..=n).collect(), weights).expect("build graph")
    }

    #[test]
    fn creates_n_squared_vars_and_3n_constraints() {
        let graph = ring_graph(5);
        let (model, x) = build_assignment_model(&graph).expect("build model");

        assert_eq!(model.num_vars(), 25);
        assert_eq!(model.num_constraints(), 15);
        assert_eq!(x.n(), 5);
    }

    #[test]
    fn arc_variables_are_distinct_handles() {
        let graph = ring_graph(3);
        let (_, x) = build_assignment_model(&graph).expect("build model");

        assert_ne!(x.var(0, 1), x.var(1, 0));
        assert_ne!(x.var(0, 1), x.var(0, 2));
    }

    #[test]
    fn model_construction_is_deterministic() {
        let graph = ring_graph(4);
        let (first, _) = build_assignment_model(&graph).expect("build model");
        let (second, _) = build_assignment_model(&graph).expect("build model");

        assert_eq!(first, second);
    }
}
