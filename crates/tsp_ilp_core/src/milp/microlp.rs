//! Backend adapter over the pure-Rust `microlp` simplex + branch-and-bound
//! solver.
//!
//! microlp exposes no mid-search callback, so the incumbent protocol is
//! honored at its granularity: the one integer-feasible assignment it
//! produces (the optimum) is delivered to the observer before `solve`
//! returns. It also exposes no node/iteration counters or limits, so those
//! statistics stay unavailable and `NoSolution` is unreachable here.

use std::time::Instant;

use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use crate::{Error, Result};

use super::{
    Direction, MilpAssignment, MilpModel, MilpSolver, Relation, SolveObserver, SolveOutcome,
    SolveStats, SolveStatus, VarKind,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }

    fn build_problem(model: &MilpModel, relaxed: bool) -> (Problem, Vec<Variable>) {
        let mut objective = vec![0.0; model.num_vars()];
        for &(var, coeff) in model.objective().terms() {
            objective[var.index()] += coeff;
        }

        let direction = match model.direction() {
            Direction::Minimize => OptimizationDirection::Minimize,
            Direction::Maximize => OptimizationDirection::Maximize,
        };

        let mut problem = Problem::new(direction);
        let vars: Vec<Variable> = model
            .vars()
            .iter()
            .enumerate()
            .map(|(index, kind)| match *kind {
                VarKind::Binary if relaxed => problem.add_var(objective[index], (0.0, 1.0)),
                VarKind::Binary => problem.add_integer_var(objective[index], (0, 1)),
                VarKind::Continuous { lb, ub } => problem.add_var(objective[index], (lb, ub)),
            })
            .collect();

        for constraint in model.constraints() {
            let lhs: Vec<(Variable, f64)> = constraint
                .expr
                .terms()
                .iter()
                .map(|&(var, coeff)| (vars[var.index()], coeff))
                .collect();
            let op = match constraint.relation {
                Relation::Eq => ComparisonOp::Eq,
                Relation::Le => ComparisonOp::Le,
                Relation::Ge => ComparisonOp::Ge,
            };
            problem.add_constraint(&lhs, op, constraint.rhs);
        }

        (problem, vars)
    }

    fn map_error(err: microlp::Error) -> Error {
        match err {
            microlp::Error::Infeasible => {
                Error::Infeasible("constraints cannot be satisfied".to_string())
            }
            microlp::Error::Unbounded => {
                Error::Unbounded("objective can decrease without limit".to_string())
            }
            other => Error::solver(other.to_string()),
        }
    }
}

impl MilpSolver for MicrolpSolver {
    fn solve(
        &self,
        model: &MilpModel,
        observer: Option<&mut dyn SolveObserver>,
    ) -> Result<SolveOutcome> {
        let started = Instant::now();
        let (problem, vars) = Self::build_problem(model, false);

        log::debug!(
            "microlp: solve vars={} constraints={}",
            model.num_vars(),
            model.num_constraints()
        );

        let solution = problem.solve().map_err(Self::map_error)?;
        let values: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();
        let assignment = MilpAssignment::new(solution.objective(), values);

        if let Some(observer) = observer {
            observer.on_incumbent(&assignment);
        }

        let stats = SolveStats {
            elapsed_seconds: started.elapsed().as_secs_f64(),
            mip_gap: Some(0.0),
            ..SolveStats::default()
        };

        Ok(SolveOutcome {
            status: SolveStatus::Optimal,
            solution: Some(assignment),
            stats,
        })
    }

    fn solve_relaxation(&self, model: &MilpModel) -> Result<f64> {
        let (problem, _) = Self::build_problem(model, true);
        let solution = problem.solve().map_err(Self::map_error)?;
        Ok(solution.objective())
    }
}
