//! Incumbent reporting: reconstructs and forwards a tour each time the
//! backend announces an improved integer-feasible assignment.

use crate::{
    ArcVariables, NodeMapping,
    milp::{MilpAssignment, SolveObserver},
    render::TourSink,
    tour::{Assignment, Tour},
};

/// Bridges the solver's incumbent events to a [`TourSink`].
///
/// Runs on whatever thread the backend reports from; it only reads the
/// owned snapshot and renders best-effort. A reconstruction or render
/// failure is logged and never interrupts the search.
pub struct IncumbentReporter<'a> {
    x: &'a ArcVariables,
    mapping: &'a NodeMapping,
    sink: &'a dyn TourSink,
    seen: usize,
}

impl<'a> IncumbentReporter<'a> {
    pub fn new(x: &'a ArcVariables, mapping: &'a NodeMapping, sink: &'a dyn TourSink) -> Self {
        Self {
            x,
            mapping,
            sink,
            seen: 0,
        }
    }

    /// Number of incumbent events delivered so far.
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl SolveObserver for IncumbentReporter<'_> {
    fn on_incumbent(&mut self, incumbent: &MilpAssignment) {
        self.seen += 1;
        log::info!(
            "incumbent: event={} objective={}",
            self.seen,
            incumbent.objective()
        );

        let assignment = Assignment::from_milp(incumbent, self.x);
        match Tour::reconstruct(&assignment, self.mapping) {
            Ok(tour) => {
                if let Err(err) = self.sink.render(&tour, incumbent.objective(), false) {
                    log::warn!("incumbent: render failed err={err}");
                }
            }
            Err(err) => log::warn!("incumbent: reconstruction failed err={err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::IncumbentReporter;
    use crate::{
        NodeMapping, Result,
        milp::{MilpAssignment, SolveObserver},
        render::TourSink,
        tour::Tour,
    };

    struct RecordingSink {
        rendered: RefCell<Vec<(Vec<usize>, f64, bool)>>,
    }

    impl TourSink for RecordingSink {
        fn render(&self, tour: &Tour, cost: f64, blocking: bool) -> Result<()> {
            self.rendered
                .borrow_mut()
                .push((tour.nodes().to_vec(), cost, blocking));
            Ok(())
        }
    }

    fn arc_variables_4() -> crate::ArcVariables {
        let graph =
            crate::WeightedDigraph::from_weights(vec![1, 2, 3, 4], vec![1.0; 16]).expect("graph");
        let (_, x) = crate::build_assignment_model(&graph).expect("model");
        x
    }

    #[test]
    fn forwards_reconstructed_tours_without_blocking() {
        let x = arc_variables_4();
        let mapping = NodeMapping::new(vec![1, 2, 3, 4]).expect("mapping");
        let sink = RecordingSink {
            rendered: RefCell::new(Vec::new()),
        };

        // perimeter cycle 0 -> 1 -> 2 -> 3 -> 0 over 16 arc vars + value matrix
        let mut values = vec![0.0; 16];
        for &(i, j) in &[(0usize, 1usize), (1, 2), (2, 3), (3, 0)] {
            values[i * 4 + j] = 1.0;
        }
        let incumbent = MilpAssignment::new(4.0, values);

        let mut reporter = IncumbentReporter::new(&x, &mapping, &sink);
        reporter.on_incumbent(&incumbent);

        assert_eq!(reporter.seen(), 1);
        let rendered = sink.rendered.borrow();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, vec![1, 2, 3, 4, 1]);
        assert_eq!(rendered[0].1, 4.0);
        assert!(!rendered[0].2, "incumbent renders must be non-blocking");
    }

    #[test]
    fn broken_assignments_are_swallowed() {
        let x = arc_variables_4();
        let mapping = NodeMapping::new(vec![1, 2, 3, 4]).expect("mapping");
        let sink = RecordingSink {
            rendered: RefCell::new(Vec::new()),
        };

        // two disjoint 2-cycles: reconstruction fails, reporter must not panic
        let mut values = vec![0.0; 16];
        for &(i, j) in &[(0usize, 1usize), (1, 0), (2, 3), (3, 2)] {
            values[i * 4 + j] = 1.0;
        }
        let incumbent = MilpAssignment::new(4.0, values);

        let mut reporter = IncumbentReporter::new(&x, &mapping, &sink);
        reporter.on_incumbent(&incumbent);

        assert_eq!(reporter.seen(), 1);
        assert!(sink.rendered.borrow().is_empty());
    }
}
