//! TSPLIB95 distance functions.
//!
//! Each function reproduces the rounding behavior mandated by the TSPLIB95
//! document, so weights computed here agree with published optima.

const ATT_SCALE: f64 = 10.0;
const GEO_EARTH_RADIUS: f64 = 6378.388;
const GEO_MINUTES_PER_DEGREE: f64 = 3.0 / 5.0;

/// TSPLIB `nint`: round half up.
fn nint(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub(crate) fn euc_2d((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    nint(((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
}

pub(crate) fn ceil_2d((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt().ceil()
}

/// Pseudo-Euclidean distance used by the `att48`/`att532` instances.
pub(crate) fn att((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    let r = (((x1 - x2).powi(2) + (y1 - y2).powi(2)) / ATT_SCALE).sqrt();
    let t = nint(r);
    if t < r { t + 1.0 } else { t }
}

/// Geographical distance; coordinates are DDD.MM (degrees and minutes).
pub(crate) fn geo((x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    let (lat1, lon1) = (to_radians(x1), to_radians(y1));
    let (lat2, lon2) = (to_radians(x2), to_radians(y2));

    let q1 = (lon1 - lon2).cos();
    let q2 = (lat1 - lat2).cos();
    let q3 = (lat1 + lat2).cos();
    (GEO_EARTH_RADIUS * (0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3)).acos() + 1.0).floor()
}

fn to_radians(ddd_mm: f64) -> f64 {
    let deg = nint(ddd_mm);
    let min = ddd_mm - deg;
    std::f64::consts::PI * (deg + min / GEO_MINUTES_PER_DEGREE) / 180.0
}
