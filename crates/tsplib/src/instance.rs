//! TSPLIB95 instance-file parser.

use std::{fs, path::PathBuf};

use crate::{TsplibError, TsplibResult, weights};

const NODE_COORD_SECTION_HEADER: &str = "NODE_COORD_SECTION";
const EDGE_WEIGHT_SECTION_HEADER: &str = "EDGE_WEIGHT_SECTION";
const DISPLAY_DATA_SECTION_HEADER: &str = "DISPLAY_DATA_SECTION";
const EOF_MARKER: &str = "EOF";

/// TSPLIB `TYPE` values this reader accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProblemType {
    Tsp,
    Atsp,
}

/// TSPLIB `EDGE_WEIGHT_TYPE` values this reader accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeWeightType {
    Explicit,
    Euc2d,
    Ceil2d,
    Att,
    Geo,
}

impl EdgeWeightType {
    fn parse(value: &str) -> TsplibResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "EXPLICIT" => Ok(Self::Explicit),
            "EUC_2D" => Ok(Self::Euc2d),
            "CEIL_2D" => Ok(Self::Ceil2d),
            "ATT" => Ok(Self::Att),
            "GEO" => Ok(Self::Geo),
            other => Err(TsplibError::unsupported(format!(
                "EDGE_WEIGHT_TYPE '{other}'"
            ))),
        }
    }

    fn needs_coords(self) -> bool {
        !matches!(self, Self::Explicit)
    }
}

/// TSPLIB `EDGE_WEIGHT_FORMAT` values this reader accepts (row-wise only).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EdgeWeightFormat {
    FullMatrix,
    UpperRow,
    LowerRow,
    UpperDiagRow,
    LowerDiagRow,
}

impl EdgeWeightFormat {
    fn parse(value: &str) -> TsplibResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "FULL_MATRIX" => Ok(Self::FullMatrix),
            "UPPER_ROW" => Ok(Self::UpperRow),
            "LOWER_ROW" => Ok(Self::LowerRow),
            "UPPER_DIAG_ROW" => Ok(Self::UpperDiagRow),
            "LOWER_DIAG_ROW" => Ok(Self::LowerDiagRow),
            other => Err(TsplibError::unsupported(format!(
                "EDGE_WEIGHT_FORMAT '{other}'"
            ))),
        }
    }

    fn entry_count(self, n: usize) -> usize {
        match self {
            Self::FullMatrix => n * n,
            Self::UpperRow | Self::LowerRow => n * (n - 1) / 2,
            Self::UpperDiagRow | Self::LowerDiagRow => n * (n + 1) / 2,
        }
    }
}

/// TSPLIB `DISPLAY_DATA_TYPE` values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayDataType {
    CoordDisplay,
    TwodDisplay,
    NoDisplay,
}

impl DisplayDataType {
    fn parse(value: &str) -> TsplibResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "COORD_DISPLAY" => Ok(Self::CoordDisplay),
            "TWOD_DISPLAY" => Ok(Self::TwodDisplay),
            "NO_DISPLAY" => Ok(Self::NoDisplay),
            other => Err(TsplibError::unsupported(format!(
                "DISPLAY_DATA_TYPE '{other}'"
            ))),
        }
    }
}

/// A parsed TSPLIB instance.
///
/// Node identifiers are kept exactly as stored in the file (1-based in
/// every published instance, but nothing here assumes contiguity); use
/// [`Instance::node_ids`] for the file order and [`Instance::weight`] /
/// [`Instance::weight_by_index`] for pairwise costs.
#[derive(Clone, Debug)]
pub struct Instance {
    name: Option<String>,
    problem_type: Option<ProblemType>,
    comment_lines: Vec<String>,
    dimension: usize,
    edge_weight_type: EdgeWeightType,
    node_ids: Vec<usize>,
    coords: Vec<(f64, f64)>,
    display_coords: Vec<(f64, f64)>,
    display_data_type: Option<DisplayDataType>,
    explicit_weights: Vec<f64>,
}

impl Instance {
    /// Reads and parses an instance file from disk.
    pub fn from_file(path: impl Into<PathBuf>) -> TsplibResult<Self> {
        let text = fs::read_to_string(path.into())?;
        Self::from_text(&text)
    }

    /// Parses an instance from text content.
    ///
    /// Parsing is permissive about unknown header keywords (ignored) and
    /// strict about everything the solver consumes: `DIMENSION` must be
    /// declared before any section, section lengths must match it, and the
    /// weight data must be complete.
    pub fn from_text(text: &str) -> TsplibResult<Self> {
        Parser::new(text).parse()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn problem_type(&self) -> Option<ProblemType> {
        self.problem_type
    }

    pub fn comment_lines(&self) -> &[String] {
        &self.comment_lines
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn edge_weight_type(&self) -> EdgeWeightType {
        self.edge_weight_type
    }

    /// Node identifiers in file order.
    pub fn node_ids(&self) -> &[usize] {
        &self.node_ids
    }

    /// Pairwise cost by node identifier. `None` if either id is unknown.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        let i = self.node_ids.iter().position(|&id| id == a)?;
        let j = self.node_ids.iter().position(|&id| id == b)?;
        Some(self.weight_by_index(i, j))
    }

    /// Pairwise cost by position in [`Instance::node_ids`].
    ///
    /// # Panics
    ///
    /// Panics if either index is out of `0..dimension`.
    pub fn weight_by_index(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.dimension && j < self.dimension);
        match self.edge_weight_type {
            EdgeWeightType::Explicit => self.explicit_weights[i * self.dimension + j],
            EdgeWeightType::Euc2d => weights::euc_2d(self.coords[i], self.coords[j]),
            EdgeWeightType::Ceil2d => weights::ceil_2d(self.coords[i], self.coords[j]),
            EdgeWeightType::Att => weights::att(self.coords[i], self.coords[j]),
            EdgeWeightType::Geo => weights::geo(self.coords[i], self.coords[j]),
        }
    }

    /// 2-D plotting coordinate for the node at `index`, when the instance
    /// supports graphical display: either an explicit display-data section
    /// or node coordinates (coordinate-based weights, or `COORD_DISPLAY`
    /// alongside an explicit matrix).
    pub fn display_coord(&self, index: usize) -> Option<(f64, f64)> {
        if self.display_data_type == Some(DisplayDataType::NoDisplay) {
            return None;
        }
        if !self.display_coords.is_empty() {
            return self.display_coords.get(index).copied();
        }
        self.coords.get(index).copied()
    }

    /// Whether [`Instance::display_coord`] yields coordinates for every node.
    pub fn supports_display(&self) -> bool {
        self.display_coord(0).is_some()
    }
}

struct Parser<'a> {
    lines: std::str::Lines<'a>,
    name: Option<String>,
    problem_type: Option<ProblemType>,
    comment_lines: Vec<String>,
    dimension: Option<usize>,
    edge_weight_type: Option<EdgeWeightType>,
    edge_weight_format: Option<EdgeWeightFormat>,
    display_data_type: Option<DisplayDataType>,
    node_ids: Vec<usize>,
    coords: Vec<(f64, f64)>,
    display_ids: Vec<usize>,
    display_coords: Vec<(f64, f64)>,
    raw_weights: Vec<f64>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            name: None,
            problem_type: None,
            comment_lines: Vec::new(),
            dimension: None,
            edge_weight_type: None,
            edge_weight_format: None,
            display_data_type: None,
            node_ids: Vec::new(),
            coords: Vec::new(),
            display_ids: Vec::new(),
            display_coords: Vec::new(),
            raw_weights: Vec::new(),
        }
    }

    fn parse(mut self) -> TsplibResult<Instance> {
        while let Some(raw_line) = self.lines.next() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case(EOF_MARKER) {
                break;
            }

            if line.eq_ignore_ascii_case(NODE_COORD_SECTION_HEADER) {
                self.read_coord_section(SectionKind::NodeCoord)?;
                continue;
            }
            if line.eq_ignore_ascii_case(DISPLAY_DATA_SECTION_HEADER) {
                self.read_coord_section(SectionKind::DisplayData)?;
                continue;
            }
            if line.eq_ignore_ascii_case(EDGE_WEIGHT_SECTION_HEADER) {
                self.read_weight_section()?;
                continue;
            }

            let Some((key, value)) = line
                .split_once(':')
                .or_else(|| line.split_once('='))
                .map(|(key, value)| (key.trim().to_ascii_uppercase(), value.trim()))
            else {
                continue;
            };

            match key.as_str() {
                "NAME" => self.name = Some(value.to_string()),
                "COMMENT" => self.comment_lines.push(value.to_string()),
                "TYPE" => {
                    self.problem_type = Some(match value.to_ascii_uppercase().as_str() {
                        "TSP" => ProblemType::Tsp,
                        "ATSP" => ProblemType::Atsp,
                        other => {
                            return Err(TsplibError::unsupported(format!("TYPE '{other}'")));
                        }
                    });
                }
                "DIMENSION" => {
                    let parsed = value.parse::<usize>().map_err(|e| {
                        TsplibError::invalid_data(format!("Bad DIMENSION value '{value}': {e}"))
                    })?;
                    self.dimension = Some(parsed);
                }
                "EDGE_WEIGHT_TYPE" => self.edge_weight_type = Some(EdgeWeightType::parse(value)?),
                "EDGE_WEIGHT_FORMAT" => {
                    self.edge_weight_format = Some(EdgeWeightFormat::parse(value)?);
                }
                "DISPLAY_DATA_TYPE" => {
                    self.display_data_type = Some(DisplayDataType::parse(value)?);
                }
                _ => {}
            }
        }

        self.finish()
    }

    fn dimension(&self) -> TsplibResult<usize> {
        self.dimension
            .ok_or_else(|| TsplibError::invalid_data("DIMENSION must precede data sections"))
    }

    fn next_data_line(&mut self, section: &str) -> TsplibResult<&'a str> {
        for line in self.lines.by_ref() {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(line);
            }
        }
        Err(TsplibError::invalid_data(format!("{section} ended early")))
    }

    fn read_coord_section(&mut self, kind: SectionKind) -> TsplibResult<()> {
        let n = self.dimension()?;
        for _ in 0..n {
            let line = self.next_data_line(kind.header())?;
            let mut tokens = line.split_whitespace();
            let id = parse_token::<usize>(&mut tokens, kind.header(), "node id")?;
            let x = parse_token::<f64>(&mut tokens, kind.header(), "x coordinate")?;
            let y = parse_token::<f64>(&mut tokens, kind.header(), "y coordinate")?;
            if tokens.next().is_some() {
                return Err(TsplibError::invalid_data(format!(
                    "{}: trailing tokens on line '{line}'",
                    kind.header()
                )));
            }

            match kind {
                SectionKind::NodeCoord => {
                    self.node_ids.push(id);
                    self.coords.push((x, y));
                }
                SectionKind::DisplayData => {
                    self.display_ids.push(id);
                    self.display_coords.push((x, y));
                }
            }
        }
        Ok(())
    }

    fn read_weight_section(&mut self) -> TsplibResult<()> {
        let n = self.dimension()?;
        let format = self.edge_weight_format.ok_or_else(|| {
            TsplibError::invalid_data("EDGE_WEIGHT_SECTION requires EDGE_WEIGHT_FORMAT")
        })?;
        let expected = format.entry_count(n);

        while self.raw_weights.len() < expected {
            let line = self.lines.next().map(str::trim).ok_or_else(|| {
                TsplibError::invalid_data(format!(
                    "EDGE_WEIGHT_SECTION ended early: {} of {expected} entries",
                    self.raw_weights.len()
                ))
            })?;

            for token in line.split_whitespace() {
                let value: f64 = token.parse().map_err(|e| {
                    TsplibError::invalid_data(format!("Bad weight token '{token}': {e}"))
                })?;
                self.raw_weights.push(value);
                if self.raw_weights.len() == expected {
                    break;
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> TsplibResult<Instance> {
        let n = self.dimension()?;
        if n == 0 {
            return Err(TsplibError::invalid_data("DIMENSION must be positive"));
        }
        let edge_weight_type = self
            .edge_weight_type
            .ok_or_else(|| TsplibError::invalid_data("Missing EDGE_WEIGHT_TYPE"))?;

        let mut node_ids = self.node_ids;
        let coords = self.coords;
        if edge_weight_type.needs_coords() {
            if coords.len() != n {
                return Err(TsplibError::invalid_data(format!(
                    "NODE_COORD_SECTION has {} nodes, DIMENSION is {n}",
                    coords.len()
                )));
            }
        } else if node_ids.is_empty() {
            // EXPLICIT instances usually omit coordinates; ids are implicit.
            node_ids = (1..=n).collect();
        }
        ensure_unique_ids(&node_ids)?;

        let explicit_weights = if edge_weight_type == EdgeWeightType::Explicit {
            let format = self.edge_weight_format.ok_or_else(|| {
                TsplibError::invalid_data("EXPLICIT instances require EDGE_WEIGHT_FORMAT")
            })?;
            if self.raw_weights.len() != format.entry_count(n) {
                return Err(TsplibError::invalid_data(format!(
                    "EDGE_WEIGHT_SECTION has {} entries, expected {}",
                    self.raw_weights.len(),
                    format.entry_count(n)
                )));
            }
            expand_matrix(format, n, &self.raw_weights)
        } else {
            Vec::new()
        };

        // Display data is keyed by node id; realign it to file order.
        let display_coords = if self.display_coords.is_empty() {
            Vec::new()
        } else {
            if self.display_coords.len() != n {
                return Err(TsplibError::invalid_data(format!(
                    "DISPLAY_DATA_SECTION has {} nodes, DIMENSION is {n}",
                    self.display_coords.len()
                )));
            }
            let mut aligned = vec![(0.0, 0.0); n];
            for (pos, &id) in self.display_ids.iter().enumerate() {
                let index = node_ids.iter().position(|&nid| nid == id).ok_or_else(|| {
                    TsplibError::invalid_data(format!("DISPLAY_DATA_SECTION: unknown node id {id}"))
                })?;
                aligned[index] = self.display_coords[pos];
            }
            aligned
        };

        Ok(Instance {
            name: self.name,
            problem_type: self.problem_type,
            comment_lines: self.comment_lines,
            dimension: n,
            edge_weight_type,
            node_ids,
            coords,
            display_coords,
            display_data_type: self.display_data_type,
            explicit_weights,
        })
    }
}

#[derive(Clone, Copy)]
enum SectionKind {
    NodeCoord,
    DisplayData,
}

impl SectionKind {
    fn header(self) -> &'static str {
        match self {
            Self::NodeCoord => NODE_COORD_SECTION_HEADER,
            Self::DisplayData => DISPLAY_DATA_SECTION_HEADER,
        }
    }
}

fn parse_token<T: std::str::FromStr>(
    tokens: &mut std::str::SplitWhitespace<'_>,
    section: &str,
    what: &str,
) -> TsplibResult<T>
where
    T::Err: std::fmt::Display,
{
    let token = tokens
        .next()
        .ok_or_else(|| TsplibError::invalid_data(format!("{section}: missing {what}")))?;
    token
        .parse()
        .map_err(|e| TsplibError::invalid_data(format!("{section}: bad {what} '{token}': {e}")))
}

fn ensure_unique_ids(node_ids: &[usize]) -> TsplibResult<()> {
    let mut seen = std::collections::HashSet::with_capacity(node_ids.len());
    for &id in node_ids {
        if !seen.insert(id) {
            return Err(TsplibError::invalid_data(format!("Duplicate node id {id}")));
        }
    }
    Ok(())
}

/// Expands a row-wise weight listing into a dense row-major `n x n` matrix.
/// Triangular formats are mirrored; missing diagonals are zero.
fn expand_matrix(format: EdgeWeightFormat, n: usize, raw: &[f64]) -> Vec<f64> {
    let mut matrix = vec![0.0; n * n];
    let mut it = raw.iter().copied();
    let mut next = || it.next().unwrap_or(0.0);

    match format {
        EdgeWeightFormat::FullMatrix => {
            for cell in matrix.iter_mut() {
                *cell = next();
            }
        }
        EdgeWeightFormat::UpperRow => {
            for i in 0..n {
                for j in (i + 1)..n {
                    let w = next();
                    matrix[i * n + j] = w;
                    matrix[j * n + i] = w;
                }
            }
        }
        EdgeWeightFormat::LowerRow => {
            for i in 0..n {
                for j in 0..i {
                    let w = next();
                    matrix[i * n + j] = w;
                    matrix[j * n + i] = w;
                }
            }
        }
        EdgeWeightFormat::UpperDiagRow => {
            for i in 0..n {
                for j in i..n {
                    let w = next();
                    matrix[i * n + j] = w;
                    matrix[j * n + i] = w;
                }
            }
        }
        EdgeWeightFormat::LowerDiagRow => {
            for i in 0..n {
                for j in 0..=i {
                    let w = next();
                    matrix[i * n + j] = w;
                    matrix[j * n + i] = w;
                }
            }
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::{EdgeWeightFormat, EdgeWeightType, Instance, ProblemType, expand_matrix};

    const EUC_SQUARE: &str = "\
NAME: square4
TYPE: TSP
COMMENT: unit test instance
DIMENSION: 4
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 10 0
3 10 10
4 0 10
EOF
";

    const EXPLICIT_UPPER: &str = "\
NAME: tri3
TYPE: TSP
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: UPPER_ROW
EDGE_WEIGHT_SECTION
1 2
3
EOF
";

    #[test]
    fn parses_euc_2d_header_and_coords() {
        let instance = Instance::from_text(EUC_SQUARE).expect("parse instance");

        assert_eq!(instance.name(), Some("square4"));
        assert_eq!(instance.problem_type(), Some(ProblemType::Tsp));
        assert_eq!(instance.dimension(), 4);
        assert_eq!(instance.edge_weight_type(), EdgeWeightType::Euc2d);
        assert_eq!(instance.node_ids(), &[1, 2, 3, 4]);
    }

    #[test]
    fn euc_2d_weights_follow_tsplib_rounding() {
        let instance = Instance::from_text(EUC_SQUARE).expect("parse instance");

        assert_eq!(instance.weight(1, 2), Some(10.0));
        // diagonal: sqrt(200) = 14.14... rounds to 14
        assert_eq!(instance.weight(1, 3), Some(14.0));
        assert_eq!(instance.weight(9, 1), None);
    }

    #[test]
    fn euc_2d_instances_support_display() {
        let instance = Instance::from_text(EUC_SQUARE).expect("parse instance");
        assert!(instance.supports_display());
        assert_eq!(instance.display_coord(2), Some((10.0, 10.0)));
    }

    #[test]
    fn parses_explicit_upper_row_and_mirrors() {
        let instance = Instance::from_text(EXPLICIT_UPPER).expect("parse instance");

        assert_eq!(instance.node_ids(), &[1, 2, 3]);
        assert_eq!(instance.weight(1, 2), Some(1.0));
        assert_eq!(instance.weight(2, 1), Some(1.0));
        assert_eq!(instance.weight(2, 3), Some(3.0));
        assert_eq!(instance.weight(1, 1), Some(0.0));
        assert!(!instance.supports_display());
    }

    #[test]
    fn weight_section_may_wrap_lines_arbitrarily() {
        let text = EXPLICIT_UPPER.replace("1 2\n3", "1\n2 3");
        let instance = Instance::from_text(&text).expect("parse instance");
        assert_eq!(instance.weight(1, 3), Some(2.0));
    }

    #[test]
    fn rejects_section_before_dimension() {
        let text = "\
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
";
        let err = Instance::from_text(text).expect_err("section before DIMENSION should fail");
        assert!(err.to_string().contains("DIMENSION"));
    }

    #[test]
    fn rejects_short_coord_section() {
        let text = "\
DIMENSION: 3
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
2 1 1
";
        let err = Instance::from_text(text).expect_err("short section should fail");
        assert!(err.to_string().contains("ended early"));
    }

    #[test]
    fn rejects_unsupported_edge_weight_type() {
        let text = "DIMENSION: 3\nEDGE_WEIGHT_TYPE: XRAY1\n";
        let err = Instance::from_text(text).expect_err("xray should be unsupported");
        assert!(err.to_string().contains("XRAY1"));
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let text = "\
DIMENSION: 2
EDGE_WEIGHT_TYPE: EUC_2D
NODE_COORD_SECTION
1 0 0
1 1 1
";
        let err = Instance::from_text(text).expect_err("duplicate ids should fail");
        assert!(err.to_string().contains("Duplicate node id 1"));
    }

    #[test]
    fn display_data_section_overrides_missing_coords() {
        let text = "\
DIMENSION: 3
EDGE_WEIGHT_TYPE: EXPLICIT
EDGE_WEIGHT_FORMAT: FULL_MATRIX
DISPLAY_DATA_TYPE: TWOD_DISPLAY
EDGE_WEIGHT_SECTION
0 1 2
1 0 3
2 3 0
DISPLAY_DATA_SECTION
1 0.0 0.0
2 5.0 0.0
3 5.0 5.0
EOF
";
        let instance = Instance::from_text(text).expect("parse instance");
        assert!(instance.supports_display());
        assert_eq!(instance.display_coord(1), Some((5.0, 0.0)));
        assert_eq!(instance.weight(2, 3), Some(3.0));
    }

    #[test]
    fn expand_matrix_lower_diag_row_mirrors() {
        let raw = [0.0, 7.0, 0.0, 8.0, 9.0, 0.0];
        let matrix = expand_matrix(EdgeWeightFormat::LowerDiagRow, 3, &raw);
        let at = |i: usize, j: usize| matrix[i * 3 + j];
        assert_eq!(at(0, 1), 7.0);
        assert_eq!(at(1, 0), 7.0);
        assert_eq!(at(2, 1), 9.0);
        assert_eq!(at(1, 2), 9.0);
    }
}
