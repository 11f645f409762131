//! Tour reconstruction: decoding an arc-assignment matrix into an ordered
//! closed tour.

use std::fmt;

use crate::{
    ArcVariables, Error, NodeId, NodeMapping, Result,
    milp::MilpAssignment,
};

/// Values above this are treated as "arc used"; incumbent snapshots may be
/// fractionally rounded, so 0/1 purity is not assumed.
const ARC_THRESHOLD: f64 = 0.5;

const DEPOT_INDEX: usize = 0;

/// Snapshot of the `n x n` arc-value matrix at optimality or at an
/// incumbent event.
#[derive(Clone, Debug)]
pub struct Assignment {
    n: usize,
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(n: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != n * n {
            return Err(Error::invariant(format!(
                "assignment matrix has {} entries, expected {}",
                values.len(),
                n * n
            )));
        }
        Ok(Self { n, values })
    }

    /// Extracts the arc matrix from a solver assignment.
    pub fn from_milp(assignment: &MilpAssignment, x: &ArcVariables) -> Self {
        let n = x.n();
        let values = (0..n * n)
            .map(|flat| assignment.value(x.var(flat / n, flat % n)))
            .collect();
        Self { n, values }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn arc_used(&self, i: usize, j: usize) -> bool {
        self.value(i, j) > ARC_THRESHOLD
    }

    fn used_successor(&self, i: usize) -> Option<usize> {
        (0..self.n).find(|&j| self.arc_used(i, j))
    }
}

/// Ordered closed tour: `n + 1` location identifiers, first == last.
/// Recomputed fresh from each assignment, never mutated in place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tour {
    nodes: Vec<NodeId>,
}

impl Tour {
    /// Walks the assignment from the depot, following the used outgoing arc
    /// of each location until the depot is revisited.
    ///
    /// The walk assumes a degree-feasible input (one used outgoing arc per
    /// location). An assignment that does not decode into a single n-cycle
    /// means subtour elimination was violated upstream and is reported as
    /// an invariant violation, never silently truncated.
    pub fn reconstruct(assignment: &Assignment, mapping: &NodeMapping) -> Result<Self> {
        let n = assignment.n();
        if mapping.len() != n {
            return Err(Error::invariant(format!(
                "assignment is over {n} locations but the mapping has {}",
                mapping.len()
            )));
        }

        let mut indices = Vec::with_capacity(n + 1);
        let mut current = DEPOT_INDEX;
        loop {
            indices.push(current);
            let Some(next) = assignment.used_successor(current) else {
                return Err(Error::invariant(format!(
                    "no used outgoing arc at location index {current}"
                )));
            };
            current = next;
            if current == DEPOT_INDEX {
                break;
            }
            if indices.len() > n {
                return Err(Error::invariant(format!(
                    "walk did not return to the depot within {n} steps"
                )));
            }
        }

        if indices.len() != n {
            return Err(Error::invariant(format!(
                "assignment decodes into a {}-location cycle, expected {n}; \
                 subtour elimination violated",
                indices.len()
            )));
        }

        let mut nodes: Vec<NodeId> = indices.into_iter().map(|i| mapping.id_of(i)).collect();
        nodes.push(nodes[0]);
        Ok(Self { nodes })
    }

    /// Closed sequence of location identifiers (length `n + 1`).
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of distinct locations visited.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total weight of the arcs along the tour.
    pub fn cost(&self, graph: &crate::WeightedDigraph) -> Result<f64> {
        let mapping = graph.mapping();
        let mut total = 0.0;
        for pair in self.nodes.windows(2) {
            let from = mapping.index_of(pair[0]).ok_or_else(|| {
                Error::invariant(format!("tour node {} is not in the graph", pair[0]))
            })?;
            let to = mapping.index_of(pair[1]).ok_or_else(|| {
                Error::invariant(format!("tour node {} is not in the graph", pair[1]))
            })?;
            total += graph.weight(from, to);
        }
        Ok(total)
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, node) in self.nodes.iter().enumerate() {
            if pos > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Assignment, Tour};
    use crate::{NodeMapping, WeightedDigraph};

    fn matrix_from_arcs(n: usize, arcs: &[(usize, usize)]) -> Assignment {
        let mut values = vec![0.0; n * n];
        for &(i, j) in arcs {
            values[i * n + j] = 1.0;
        }
        Assignment::new(n, values).expect("build assignment")
    }

    fn identity_mapping(n: usize) -> NodeMapping {
        NodeMapping::new((1..=n).collect()).expect("build mapping")
    }

    #[test]
    fn reconstructs_a_full_cycle() {
        let assignment = matrix_from_arcs(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let tour = Tour::reconstruct(&assignment, &identity_mapping(4)).expect("reconstruct");

        assert_eq!(tour.nodes(), &[1, 2, 3, 4, 1]);
        assert_eq!(tour.len(), 4);
    }

    #[test]
    fn fractional_values_threshold_at_half() {
        // arcs (0,1) = 0.8 and (1,0) = 0.51 in a 2x2 matrix
        let assignment = Assignment::new(2, vec![0.0, 0.8, 0.51, 0.0]).expect("build assignment");

        let tour = Tour::reconstruct(&assignment, &identity_mapping(2)).expect("reconstruct");
        assert_eq!(tour.nodes(), &[1, 2, 1]);
    }

    #[test]
    fn two_disjoint_2_cycles_are_incomplete_coverage() {
        let assignment = matrix_from_arcs(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
        let err = Tour::reconstruct(&assignment, &identity_mapping(4))
            .expect_err("two 2-cycles must not decode as a tour");

        assert!(err.to_string().contains("2-location cycle, expected 4"));
    }

    #[test]
    fn missing_outgoing_arc_is_reported() {
        let assignment = matrix_from_arcs(3, &[(0, 1)]);
        let err = Tour::reconstruct(&assignment, &identity_mapping(3))
            .expect_err("dead end must not decode as a tour");

        assert!(err.to_string().contains("no used outgoing arc"));
    }

    #[test]
    fn walk_that_avoids_the_depot_terminates() {
        // 0 -> 1, then 1 and 2 cycle between themselves
        let assignment = matrix_from_arcs(3, &[(0, 1), (1, 2), (2, 1)]);
        let err = Tour::reconstruct(&assignment, &identity_mapping(3))
            .expect_err("non-depot cycle must not loop forever");

        assert!(err.to_string().contains("did not return to the depot"));
    }

    #[test]
    fn cost_sums_arc_weights_along_the_sequence() {
        let weights = vec![
            0.0, 1.0, 9.0, //
            9.0, 0.0, 2.0, //
            3.0, 9.0, 0.0,
        ];
        let graph = WeightedDigraph::from_weights(vec![1, 2, 3], weights).expect("build graph");
        let assignment = matrix_from_arcs(3, &[(0, 1), (1, 2), (2, 0)]);
        let tour = Tour::reconstruct(&assignment, graph.mapping()).expect("reconstruct");

        assert_eq!(tour.cost(&graph).expect("cost"), 6.0);
    }

    #[test]
    fn display_joins_ids_with_arrows() {
        let assignment = matrix_from_arcs(3, &[(0, 1), (1, 2), (2, 0)]);
        let tour = Tour::reconstruct(&assignment, &identity_mapping(3)).expect("reconstruct");

        assert_eq!(tour.to_string(), "1 -> 2 -> 3 -> 1");
    }
}
