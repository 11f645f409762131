use std::{collections::HashMap, path::Path};

use crate::{Error, Result};

const MIN_TOUR_NODES: usize = 2;

/// Opaque location identifier (TSPLIB node number).
pub type NodeId = usize;

/// Bidirectional id <-> index bijection, fixed for the lifetime of one run.
/// Built once from the instance and passed to every component that needs to
/// translate between solver indices and location identifiers.
#[derive(Clone, Debug)]
pub struct NodeMapping {
    ids: Vec<NodeId>,
    index_by_id: HashMap<NodeId, usize>,
}

impl NodeMapping {
    pub fn new(ids: Vec<NodeId>) -> Result<Self> {
        let mut index_by_id = HashMap::with_capacity(ids.len());
        for (index, &id) in ids.iter().enumerate() {
            if index_by_id.insert(id, index).is_some() {
                return Err(Error::invalid_input(format!("duplicate node id {id}")));
            }
        }
        Ok(Self { ids, index_by_id })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier of the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn id_of(&self, index: usize) -> NodeId {
        self.ids[index]
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }
}

/// Weighted complete digraph over `n` locations: the data the formulation is
/// built from. Weights may be asymmetric; read-only after construction.
#[derive(Clone, Debug)]
pub struct WeightedDigraph {
    mapping: NodeMapping,
    weights: Vec<f64>,
    display_coords: Vec<Option<(f64, f64)>>,
}

impl WeightedDigraph {
    /// Loads a TSPLIB instance file and builds the graph from it.
    pub fn from_instance_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let instance = tsplib::Instance::from_file(path)?;
        log::info!(
            "instance: file={} name={} n={}",
            path.display(),
            instance.name().unwrap_or("<unnamed>"),
            instance.dimension()
        );
        Self::from_instance(&instance)
    }

    /// Builds the graph from a parsed TSPLIB instance.
    pub fn from_instance(instance: &tsplib::Instance) -> Result<Self> {
        let n = instance.dimension();
        let mut weights = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                weights[i * n + j] = instance.weight_by_index(i, j);
            }
        }
        let display_coords = (0..n).map(|i| instance.display_coord(i)).collect();
        Self::build(instance.node_ids().to_vec(), weights, display_coords)
    }

    /// Builds the graph from an explicit row-major weight matrix. Intended
    /// for programmatic instances and tests.
    pub fn from_weights(ids: Vec<NodeId>, weights: Vec<f64>) -> Result<Self> {
        let n = ids.len();
        let display_coords = vec![None; n];
        Self::build(ids, weights, display_coords)
    }

    /// As [`WeightedDigraph::from_weights`], with a display coordinate per node.
    pub fn from_weights_and_coords(
        ids: Vec<NodeId>,
        weights: Vec<f64>,
        coords: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if coords.len() != ids.len() {
            return Err(Error::invalid_input(format!(
                "{} coordinates for {} nodes",
                coords.len(),
                ids.len()
            )));
        }
        let display_coords = coords.into_iter().map(Some).collect();
        Self::build(ids, weights, display_coords)
    }

    fn build(
        ids: Vec<NodeId>,
        weights: Vec<f64>,
        display_coords: Vec<Option<(f64, f64)>>,
    ) -> Result<Self> {
        let n = ids.len();
        if n < MIN_TOUR_NODES {
            return Err(Error::invalid_input(format!(
                "need at least {MIN_TOUR_NODES} locations for a tour, got {n}"
            )));
        }
        if weights.len() != n * n {
            return Err(Error::invalid_input(format!(
                "weight matrix has {} entries, expected {}",
                weights.len(),
                n * n
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::invalid_input(format!(
                "weights must be finite and non-negative, got {w}"
            )));
        }

        Ok(Self {
            mapping: NodeMapping::new(ids)?,
            weights,
            display_coords,
        })
    }

    pub fn n(&self) -> usize {
        self.mapping.len()
    }

    /// Cost of the arc from location index `i` to location index `j`.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.n() + j]
    }

    pub fn mapping(&self) -> &NodeMapping {
        &self.mapping
    }

    pub fn display_coord(&self, index: usize) -> Option<(f64, f64)> {
        self.display_coords.get(index).copied().flatten()
    }

    pub fn supports_display(&self) -> bool {
        !self.display_coords.is_empty() && self.display_coords.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeMapping, WeightedDigraph};

    #[test]
    fn mapping_round_trips_ids_and_indices() {
        let mapping = NodeMapping::new(vec![10, 20, 30]).expect("build mapping");

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.id_of(1), 20);
        assert_eq!(mapping.index_of(30), Some(2));
        assert_eq!(mapping.index_of(40), None);
    }

    #[test]
    fn mapping_rejects_duplicate_ids() {
        let err = NodeMapping::new(vec![1, 2, 1]).expect_err("duplicates should fail");
        assert!(err.to_string().contains("duplicate node id 1"));
    }

    #[test]
    fn graph_rejects_degenerate_sizes() {
        let err = WeightedDigraph::from_weights(vec![1], vec![0.0]).expect_err("n=1 should fail");
        assert!(err.to_string().contains("at least 2 locations"));
    }

    #[test]
    fn graph_rejects_negative_weights() {
        let err = WeightedDigraph::from_weights(vec![1, 2], vec![0.0, -1.0, 1.0, 0.0])
            .expect_err("negative weight should fail");
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn graph_rejects_wrong_matrix_size() {
        let err = WeightedDigraph::from_weights(vec![1, 2], vec![0.0, 1.0])
            .expect_err("short matrix should fail");
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn graph_exposes_asymmetric_weights() {
        let graph = WeightedDigraph::from_weights(vec![1, 2], vec![0.0, 3.0, 7.0, 0.0])
            .expect("build graph");
        assert_eq!(graph.weight(0, 1), 3.0);
        assert_eq!(graph.weight(1, 0), 7.0);
        assert!(!graph.supports_display());
    }

    #[test]
    fn graph_from_instance_copies_weights_and_coords() {
        let text = "\
DIMENSION: 3
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 3 4
3 6 0
EOF
";
        let instance = tsplib::Instance::from_text(text).expect("parse instance");
        let graph = WeightedDigraph::from_instance(&instance).expect("build graph");

        assert_eq!(graph.n(), 3);
        assert_eq!(graph.weight(0, 1), 5.0);
        assert_eq!(graph.weight(0, 2), 6.0);
        assert!(graph.supports_display());
        assert_eq!(graph.display_coord(1), Some((3.0, 4.0)));
    }
}
