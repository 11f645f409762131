//! Write-once MILP model and the backend seam.
//!
//! The formulation layer builds a [`MilpModel`] (variables, constraints,
//! objective) and hands it to a [`MilpSolver`] implementation. The model is
//! never mutated after `solve` starts; incumbent callbacks only see owned
//! [`MilpAssignment`] snapshots, so no synchronization is needed even when a
//! backend searches on its own threads.

mod microlp;

pub use self::microlp::MicrolpSolver;

use crate::Result;

/// Handle for a decision variable, valid only for the model that created it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VarId(usize);

impl VarId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarKind {
    Binary,
    Continuous { lb: f64, ub: f64 },
}

/// Linear expression over model variables. Repeated variables merge their
/// coefficients; term order is the insertion order of first occurrence, so
/// identical build sequences produce identical expressions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(var: VarId, coeff: f64) -> Self {
        let mut expr = Self::new();
        expr.add(var, coeff);
        expr
    }

    pub fn add(&mut self, var: VarId, coeff: f64) {
        if let Some((_, existing)) = self.terms.iter_mut().find(|(v, _)| *v == var) {
            *existing += coeff;
        } else {
            self.terms.push((var, coeff));
        }
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Minimize,
    Maximize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub expr: LinExpr,
    pub relation: Relation,
    pub rhs: f64,
}

/// The assembled program. Written once at build time, then read by backends.
#[derive(Clone, Debug, PartialEq)]
pub struct MilpModel {
    vars: Vec<VarKind>,
    constraints: Vec<Constraint>,
    objective: LinExpr,
    direction: Direction,
}

impl MilpModel {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: LinExpr::new(),
            direction: Direction::Minimize,
        }
    }

    pub fn add_binary_var(&mut self) -> VarId {
        self.push_var(VarKind::Binary)
    }

    pub fn add_continuous_var(&mut self, lb: f64, ub: f64) -> VarId {
        self.push_var(VarKind::Continuous { lb, ub })
    }

    fn push_var(&mut self, kind: VarKind) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(kind);
        id
    }

    pub fn add_constraint(&mut self, expr: LinExpr, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            expr,
            relation,
            rhs,
        });
    }

    pub fn set_objective(&mut self, objective: LinExpr, direction: Direction) {
        self.objective = objective;
        self.direction = direction;
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn vars(&self) -> &[VarKind] {
        &self.vars
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for MilpModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete variable assignment with its objective value: the final
/// solution, or an incumbent snapshot delivered during search.
#[derive(Clone, Debug)]
pub struct MilpAssignment {
    objective: f64,
    values: Vec<f64>,
}

impl MilpAssignment {
    pub fn new(objective: f64, values: Vec<f64>) -> Self {
        Self { objective, values }
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }
}

/// Incumbent protocol: invoked by the backend, on whatever thread it reports
/// from, each time a new integer-feasible assignment is found. Handlers get
/// an owned snapshot and must not block the search for long.
pub trait SolveObserver {
    fn on_incumbent(&mut self, incumbent: &MilpAssignment);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolveStatus {
    /// Solved to proven optimality.
    Optimal,
    /// Integer-feasible but not proven optimal (stopped by a backend limit).
    Feasible,
    /// No integer-feasible assignment found within backend limits. Not an
    /// error; distinct from proven infeasibility, which is.
    NoSolution,
}

/// Search statistics. Backends report what they can observe; everything else
/// stays `None` and is surfaced as "unavailable".
#[derive(Clone, Copy, Debug, Default)]
pub struct SolveStats {
    pub elapsed_seconds: f64,
    pub nodes_explored: Option<u64>,
    pub simplex_iterations: Option<u64>,
    pub mip_gap: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub solution: Option<MilpAssignment>,
    pub stats: SolveStats,
}

/// Backend seam. Proven infeasibility and unboundedness surface as errors
/// (`Error::Infeasible` / `Error::Unbounded`), never as an empty outcome.
pub trait MilpSolver {
    fn solve(
        &self,
        model: &MilpModel,
        observer: Option<&mut dyn SolveObserver>,
    ) -> Result<SolveOutcome>;

    /// Solves the LP relaxation (integrality dropped) and returns its
    /// objective value. Used for bound reporting and relaxation-tightness
    /// comparisons.
    fn solve_relaxation(&self, model: &MilpModel) -> Result<f64>;
}
