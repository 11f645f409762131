//! Subtour-elimination strategies.
//!
//! The assignment constraints admit disjoint sub-cycles; each strategy here
//! adds a constraint family that forbids them. The three variants share the
//! same feasible integer set and optimum; they differ in constraint count
//! and LP-relaxation tightness.

mod dfj;
mod dl;
mod mtz;

pub use dfj::expected_cut_count;

use tsp_ilp_derive::CliValue;

use crate::{ArcVariables, Result, WeightedDigraph, milp::MilpModel};

/// Closed set of subtour-elimination formulations, selected by name at
/// startup (`--model`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "model")]
pub enum SubtourStrategy {
    /// Dantzig-Fulkerson-Johnson: one cut per subset of non-depot
    /// locations. Exponentially many constraints, tightest relaxation.
    Dfj,
    /// Miller-Tucker-Zemlin: polynomial big-M encoding over rank variables.
    Mtz,
    /// Desrochers-Laporte: MTZ skeleton with lifted coefficients and
    /// variable-dependent rank bounds.
    Dl,
}

impl SubtourStrategy {
    /// Adds this strategy's constraint family to the model.
    pub fn add_constraints(
        self,
        graph: &WeightedDigraph,
        model: &mut MilpModel,
        x: &ArcVariables,
    ) -> Result<()> {
        match self {
            Self::Dfj => dfj::add_constraints(graph, model, x),
            Self::Mtz => mtz::add_constraints(graph, model, x),
            Self::Dl => dl::add_constraints(graph, model, x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubtourStrategy;
    use crate::{WeightedDigraph, build_assignment_model};

    pub(crate) fn square_graph() -> WeightedDigraph {
        // unit square with exact euclidean distances; perimeter = 4.0
        let coords: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut weights = vec![0.0; 16];
        for (i, (xi, yi)) in coords.iter().enumerate() {
            for (j, (xj, yj)) in coords.iter().enumerate() {
                weights[i * 4 + j] = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
            }
        }
        WeightedDigraph::from_weights(vec![1, 2, 3, 4], weights).expect("build graph")
    }

    #[test]
    fn strategy_parses_by_name() {
        assert_eq!(
            SubtourStrategy::parse("dfj").expect("parse"),
            SubtourStrategy::Dfj
        );
        assert_eq!(
            SubtourStrategy::parse("MTZ").expect("parse"),
            SubtourStrategy::Mtz
        );
        assert_eq!(
            SubtourStrategy::parse("dl").expect("parse"),
            SubtourStrategy::Dl
        );
    }

    #[test]
    fn unknown_strategy_name_lists_expected_values() {
        let err = SubtourStrategy::parse("gg").expect_err("unknown name should fail");
        assert!(err.to_string().contains("expected dfj|mtz|dl"));
    }

    #[test]
    fn strategies_are_deterministic_per_run() {
        let graph = square_graph();
        for strategy in [SubtourStrategy::Dfj, SubtourStrategy::Mtz, SubtourStrategy::Dl] {
            let build = || {
                let (mut model, x) = build_assignment_model(&graph).expect("build model");
                strategy
                    .add_constraints(&graph, &mut model, &x)
                    .expect("add constraints");
                model
            };
            assert_eq!(build(), build(), "strategy {strategy} must be deterministic");
        }
    }
}
