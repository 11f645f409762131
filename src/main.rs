use std::time::Instant;

use log::info;

use tsp_ilp_core::{
    Result, SolverOptions, SvgTourRenderer, TourSink, WeightedDigraph, logging, solve_tsp,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let graph = WeightedDigraph::from_instance_path(options.instance_path())?;

    let renderer = if options.display {
        match SvgTourRenderer::new(&graph, options.svg_output_path()) {
            Ok(renderer) => Some(renderer),
            Err(err) => {
                log::warn!("display: disabled err={err}");
                None
            }
        }
    } else {
        None
    };
    let sink = renderer.as_ref().map(|renderer| renderer as &dyn TourSink);

    let report = solve_tsp(&graph, options.model, sink)?;
    print!("{report}");

    info!("output: time={:.2}s", now.elapsed().as_secs_f32());
    Ok(())
}
