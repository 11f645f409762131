//! Exact TSP solving by mixed-integer linear programming.
//!
//! Builds the arc-selection formulation over a weighted complete digraph,
//! applies one of three interchangeable subtour-elimination strategies
//! (DFJ cuts, MTZ, or Desrochers-Laporte rank encodings), delegates the
//! search to a MILP backend, and decodes the winning assignment into an
//! ordered tour. Incumbent solutions can be rendered live through a
//! pluggable sink.

mod error;
mod formulation;
mod graph;
mod incumbent;
pub mod logging;
mod milp;
mod options;
mod render;
mod solver;
mod subtour;
mod tour;

pub use error::{Error, Result};
pub use formulation::{ArcVariables, build_assignment_model};
pub use graph::{NodeId, NodeMapping, WeightedDigraph};
pub use incumbent::IncumbentReporter;
pub use milp::{
    Constraint, Direction, LinExpr, MicrolpSolver, MilpAssignment, MilpModel, MilpSolver,
    Relation, SolveObserver, SolveOutcome, SolveStats, SolveStatus, VarId, VarKind,
};
pub use options::{LogFormat, LogLevel, SolverOptions};
pub use render::{NullSink, SvgTourRenderer, TourSink};
pub use solver::{BestSolution, SolveReport, solve_tsp};
pub use subtour::{SubtourStrategy, expected_cut_count};
pub use tour::{Assignment, Tour};
