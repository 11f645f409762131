//! End-to-end solve orchestration: formulation, strategy constraints,
//! backend optimization, tour reconstruction, and the run report.

use std::fmt;

use crate::{
    Result, SubtourStrategy, Tour, WeightedDigraph,
    formulation::build_assignment_model,
    incumbent::IncumbentReporter,
    milp::{MicrolpSolver, MilpSolver, SolveObserver, SolveStats, SolveStatus},
    render::TourSink,
    tour::Assignment,
};

/// Best tour found by a run, with its objective value and optimality proof.
#[derive(Clone, Debug)]
pub struct BestSolution {
    pub tour: Tour,
    pub cost: f64,
    pub optimal: bool,
}

/// Everything a run reports: formulation size, search statistics, and the
/// best solution when one exists. `best == None` means no feasible solution
/// within backend limits, distinct from proven infeasibility (an error).
#[derive(Clone, Debug)]
pub struct SolveReport {
    pub strategy: SubtourStrategy,
    pub num_vars: usize,
    pub num_constraints: usize,
    pub stats: SolveStats,
    pub best: Option<BestSolution>,
}

/// Formulates the instance with the chosen strategy, runs the MILP backend,
/// and decodes the winning assignment into a tour.
///
/// When `sink` is given, every incumbent the backend reports is
/// reconstructed and rendered best-effort during the search, and the final
/// tour is rendered once more (blocking) at the end.
#[tsp_ilp_derive::timer("solver")]
pub fn solve_tsp(
    graph: &WeightedDigraph,
    strategy: SubtourStrategy,
    sink: Option<&dyn TourSink>,
) -> Result<SolveReport> {
    let n = graph.n();
    log::info!("solver: start n={n} strategy={strategy}");

    let (mut model, x) = build_assignment_model(graph)?;
    strategy.add_constraints(graph, &mut model, &x)?;
    log::info!(
        "model: vars={} constraints={}",
        model.num_vars(),
        model.num_constraints()
    );

    let backend = MicrolpSolver::new();
    let mut reporter = sink.map(|sink| IncumbentReporter::new(&x, graph.mapping(), sink));
    let observer = reporter
        .as_mut()
        .map(|reporter| reporter as &mut dyn SolveObserver);

    let outcome = backend.solve(&model, observer)?;

    let best = match &outcome.solution {
        Some(assignment) => {
            let matrix = Assignment::from_milp(assignment, &x);
            let tour = Tour::reconstruct(&matrix, graph.mapping())?;
            let best = BestSolution {
                cost: assignment.objective(),
                optimal: outcome.status == SolveStatus::Optimal,
                tour,
            };

            if let Some(sink) = sink {
                if let Err(err) = sink.render(&best.tour, best.cost, true) {
                    log::warn!("render: final tour failed err={err}");
                }
            }

            log::info!(
                "solver: complete cost={} optimal={}",
                best.cost,
                best.optimal
            );
            Some(best)
        }
        None => {
            log::warn!("solver: no feasible solution within limits");
            None
        }
    };

    Ok(SolveReport {
        strategy,
        num_vars: model.num_vars(),
        num_constraints: model.num_constraints(),
        stats: outcome.stats,
        best,
    })
}

const SECTION_RULE: &str = "-----------------------------------------------------------";

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        section(f, "Info about the MIP formulation")?;
        writeln!(f, "Strategy: {}", self.strategy)?;
        writeln!(f, "Number of decision variables: {}", self.num_vars)?;
        writeln!(f, "Number of constraints: {}", self.num_constraints)?;
        writeln!(f)?;

        section(f, "Info about the optimization process")?;
        writeln!(f, "B&C nodes explored: {}", count_or_unavailable(self.stats.nodes_explored))?;
        writeln!(f, "Simplex iterations: {}", count_or_unavailable(self.stats.simplex_iterations))?;
        match self.stats.mip_gap {
            Some(gap) => writeln!(f, "MIP gap: {gap}")?,
            None => writeln!(f, "MIP gap: unavailable")?,
        }
        writeln!(f, "Elapsed time (s): {:.4}", self.stats.elapsed_seconds)?;
        writeln!(f)?;

        section(f, "Info about the best solution found")?;
        match &self.best {
            None => writeln!(f, "No solution found!")?,
            Some(best) => {
                let mut buffer = ryu::Buffer::new();
                writeln!(f, "Is optimal: {}", if best.optimal { "Yes" } else { "No" })?;
                writeln!(f, "Cost: {}", buffer.format(best.cost))?;
                writeln!(f, "Tour: {}", best.tour)?;
            }
        }
        writeln!(f)
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{SECTION_RULE}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{SECTION_RULE}")
}

fn count_or_unavailable(count: Option<u64>) -> String {
    count.map_or_else(|| "unavailable".to_string(), |value| value.to_string())
}
