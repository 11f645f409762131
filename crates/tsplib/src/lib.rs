//! `tsplib` provides a typed Rust API for reading TSPLIB95 instance files.
//!
//! It covers the subset of the format needed to feed an exact TSP solver:
//! - keyword/value headers (`NAME`, `TYPE`, `DIMENSION`, `EDGE_WEIGHT_TYPE`, ...),
//! - `NODE_COORD_SECTION` with the `EUC_2D`, `CEIL_2D`, `ATT` and `GEO`
//!   distance functions,
//! - `EDGE_WEIGHT_SECTION` for `EXPLICIT` instances in the row-wise matrix
//!   formats,
//! - `DISPLAY_DATA_SECTION` for instances that carry separate plotting
//!   coordinates.
//!
//! # Quickstart
//!
//! ```no_run
//! use tsplib::Instance;
//!
//! fn main() -> tsplib::TsplibResult<()> {
//!     let instance = Instance::from_file("berlin52.tsp")?;
//!     let ids = instance.node_ids();
//!     let w = instance.weight(ids[0], ids[1]);
//!     println!("n={} w01={w:?}", instance.dimension());
//!     Ok(())
//! }
//! ```

mod error;
mod instance;
mod weights;

pub use error::{TsplibError, TsplibResult};
pub use instance::{DisplayDataType, EdgeWeightFormat, EdgeWeightType, Instance, ProblemType};
