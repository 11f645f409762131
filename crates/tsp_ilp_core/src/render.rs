//! Tour visualization sinks.
//!
//! The original incumbent display is a live plot; here rendering targets an
//! SVG file that is overwritten as better incumbents arrive, with the final
//! tour rendered last.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::{Error, NodeMapping, Result, Tour, WeightedDigraph};

const IMAGE_SIZE: (u32, u32) = (700, 700);
const MARGIN: i32 = 20;
const NODE_RADIUS: i32 = 3;
const DEGENERATE_PAD: f64 = 1.0;
const RANGE_PAD_FACTOR: f64 = 0.05;

/// Visualization collaborator. `blocking` distinguishes best-effort
/// incumbent frames (false) from the final render (true); failures are
/// local and must never abort the optimization.
pub trait TourSink {
    fn render(&self, tour: &Tour, cost: f64, blocking: bool) -> Result<()>;
}

/// Sink used when display is disabled: drops every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TourSink for NullSink {
    fn render(&self, _tour: &Tour, _cost: f64, _blocking: bool) -> Result<()> {
        Ok(())
    }
}

/// Draws the tour polyline over the instance display coordinates into an
/// SVG file.
#[derive(Debug)]
pub struct SvgTourRenderer {
    path: PathBuf,
    mapping: NodeMapping,
    coords: Vec<(f64, f64)>,
}

impl SvgTourRenderer {
    /// Fails when the instance carries no display coordinates; the caller
    /// is expected to fall back to non-visual reporting.
    pub fn new(graph: &WeightedDigraph, path: impl Into<PathBuf>) -> Result<Self> {
        if !graph.supports_display() {
            return Err(Error::render(
                "instance data does not support graphical display",
            ));
        }
        let coords = (0..graph.n())
            .map(|i| graph.display_coord(i).unwrap_or_default())
            .collect();
        Ok(Self {
            path: path.into(),
            mapping: graph.mapping().clone(),
            coords,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.path
    }

    fn tour_points(&self, tour: &Tour) -> Result<Vec<(f64, f64)>> {
        tour.nodes()
            .iter()
            .map(|&id| {
                self.mapping
                    .index_of(id)
                    .map(|index| self.coords[index])
                    .ok_or_else(|| Error::render(format!("tour node {id} has no coordinates")))
            })
            .collect()
    }
}

impl TourSink for SvgTourRenderer {
    fn render(&self, tour: &Tour, cost: f64, blocking: bool) -> Result<()> {
        let points = self.tour_points(tour)?;
        let (x_range, y_range) = padded_ranges(&self.coords);

        let root = SVGBackend::new(&self.path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .build_cartesian_2d(x_range, y_range)
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(points, &BLUE))
            .map_err(chart_err)?;
        chart
            .draw_series(
                self.coords
                    .iter()
                    .map(|&point| Circle::new(point, NODE_RADIUS, RED.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
        log::debug!(
            "render: wrote {} cost={cost} blocking={blocking}",
            self.path.display()
        );
        Ok(())
    }
}

fn chart_err(err: impl std::fmt::Display) -> Error {
    Error::render(err.to_string())
}

fn padded_ranges(coords: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in coords {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    (pad_range(x_min, x_max), pad_range(y_min, y_max))
}

fn pad_range(min: f64, max: f64) -> std::ops::Range<f64> {
    let span = max - min;
    let pad = if span > 0.0 {
        span * RANGE_PAD_FACTOR
    } else {
        DEGENERATE_PAD
    };
    (min - pad)..(max + pad)
}
