use std::{
    env,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use tsp_ilp_derive::{CliOptions, CliValue, KvDisplay};

use crate::{Error, Result, SubtourStrategy};

/// Runtime options for a solve run.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Subtour-elimination formulation to apply: `dfj`, `mtz`, or `dl`.
    #[cli(long = "model", parse_with = "SubtourStrategy::parse")]
    pub model: SubtourStrategy,
    /// Render incumbent and final tours while optimizing.
    pub display: bool,
    /// Output path for rendered tours.
    #[cli(long = "svg-output")]
    #[kv(fmt = "path")]
    pub svg_output: PathBuf,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Path to the TSPLIB instance file (positional).
    pub instance: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            model: SubtourStrategy::Mtz,
            display: false,
            svg_output: PathBuf::from("tour.svg"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            instance: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut saw_model = false;
        let mut saw_instance = false;
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                if saw_instance {
                    return Err(Error::invalid_input(format!(
                        "Unexpected argument: {arg}\n\n{}",
                        Self::usage()
                    )));
                }
                options.instance = arg;
                saw_instance = true;
                continue;
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, eq_value) = split_eq(raw_name);

            // Flags take no separate token, so handle them before a value
            // could be pulled from the argument stream.
            match name.as_str() {
                "display" => {
                    reject_value(&name, &eq_value)?;
                    options.display = true;
                    continue;
                }
                "no-log" => {
                    reject_value(&name, &eq_value)?;
                    options.log_level = LogLevel::Off;
                    continue;
                }
                "log-timestamp" => {
                    options.log_timestamp = match eq_value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                    continue;
                }
                "no-log-timestamp" => {
                    reject_value(&name, &eq_value)?;
                    options.log_timestamp = false;
                    continue;
                }
                _ => {}
            }

            let value = eq_value.or_else(|| match args.peek() {
                Some(next) if !next.starts_with("--") => args.next(),
                _ => None,
            });

            if options.apply_cli_option(&name, value)? {
                if name == "model" {
                    saw_model = true;
                }
                continue;
            }

            return Err(Error::invalid_input(format!(
                "Unknown option: --{name}\n\n{}",
                Self::usage()
            )));
        }

        if !saw_model {
            return Err(Error::invalid_input(format!(
                "Missing required option --model\n\n{}",
                Self::usage()
            )));
        }
        if !saw_instance {
            return Err(Error::invalid_input(format!(
                "Missing instance FILE argument\n\n{}",
                Self::usage()
            )));
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-ilp --model <dfj|mtz|dl> [options] FILE\n\n",
            "Options:\n",
            "  --model <dfj|mtz|dl>     Subtour-elimination formulation\n",
            "  --display                Render incumbent and final tours to SVG\n",
            "  --svg-output <path>      Rendered tour path (default tour.svg)\n",
            "  --no-log                 Silence all logging\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-ilp --model dfj instances/burma14.tsp\n",
            "  tsp-ilp --model dl --display --svg-output run.svg instances/berlin52.tsp\n",
            "  tsp-ilp --model mtz --no-log instances/br17.atsp\n",
        )
    }

    pub fn instance_path(&self) -> &Path {
        Path::new(&self.instance)
    }

    pub fn svg_output_path(&self) -> &Path {
        &self.svg_output
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        let log_output = self.log_output.trim();
        if log_output.is_empty() || log_output == "-" {
            None
        } else {
            Some(Path::new(log_output))
        }
    }
}

fn split_eq(raw_name: &str) -> (String, Option<String>) {
    match raw_name.split_once('=') {
        Some((name, value)) => (name.to_string(), Some(value.to_string())),
        None => (raw_name.to_string(), None),
    }
}

fn reject_value(name: &str, value: &Option<String>) -> Result<()> {
    if value.is_some() {
        return Err(Error::invalid_input(format!(
            "Flag --{name} does not take a value"
        )));
    }
    Ok(())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{LogFormat, LogLevel, SolverOptions, parse_bool};
    use crate::SubtourStrategy;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("x", "true").expect("parse"));
        assert!(parse_bool("x", "ON").expect("parse"));
        assert!(!parse_bool("x", "0").expect("parse"));
        assert!(!parse_bool("x", "off").expect("parse"));
    }

    #[test]
    fn parse_bool_rejects_unknown_values() {
        let err = parse_bool("log-timestamp", "maybe").expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --log-timestamp: maybe")
        );
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn parses_model_flags_and_positional_file() {
        let options = SolverOptions::parse_from_iter([
            "--model=dl",
            "--display",
            "--svg-output=out.svg",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
            "problem.tsp",
        ])
        .expect("parse options");

        assert_eq!(options.model, SubtourStrategy::Dl);
        assert!(options.display);
        assert_eq!(options.svg_output_path(), std::path::Path::new("out.svg"));
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
        assert_eq!(options.instance, "problem.tsp");
    }

    #[test]
    fn accepts_space_separated_option_values() {
        let options = SolverOptions::parse_from_iter(["--model", "dfj", "input.tsp"])
            .expect("parse options");
        assert_eq!(options.model, SubtourStrategy::Dfj);
        assert_eq!(options.instance, "input.tsp");
    }

    #[test]
    fn no_log_silences_logging() {
        let options = SolverOptions::parse_from_iter(["--model", "mtz", "--no-log", "f.tsp"])
            .expect("parse options");
        assert_eq!(options.log_level, LogLevel::Off);
    }

    #[test]
    fn model_is_required() {
        let err =
            SolverOptions::parse_from_iter(["file.tsp"]).expect_err("missing model should fail");
        assert!(err.to_string().contains("Missing required option --model"));
    }

    #[test]
    fn instance_file_is_required() {
        let err =
            SolverOptions::parse_from_iter(["--model=dfj"]).expect_err("missing FILE should fail");
        assert!(err.to_string().contains("Missing instance FILE"));
    }

    #[test]
    fn rejects_second_positional_argument() {
        let err = SolverOptions::parse_from_iter(["--model=dfj", "a.tsp", "b.tsp"])
            .expect_err("second positional should fail");
        assert!(err.to_string().contains("Unexpected argument: b.tsp"));
    }

    #[test]
    fn rejects_unknown_options() {
        let err = SolverOptions::parse_from_iter(["--model=dfj", "--frobnicate", "a.tsp"])
            .expect_err("unknown option should fail");
        assert!(err.to_string().contains("Unknown option: --frobnicate"));
    }

    #[test]
    fn rejects_value_on_bare_flags() {
        let err = SolverOptions::parse_from_iter(["--model=dfj", "--display=yes", "a.tsp"])
            .expect_err("flag value should fail");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn invalid_model_name_lists_choices() {
        let err = SolverOptions::parse_from_iter(["--model=concorde", "a.tsp"])
            .expect_err("unknown model should fail");
        assert!(err.to_string().contains("expected dfj|mtz|dl"));
    }

    #[test]
    fn help_short_circuits_with_usage() {
        let err = SolverOptions::parse_from_iter(["--help"]).expect_err("help short-circuits");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn options_banner_lists_key_values() {
        let options = SolverOptions::parse_from_iter(["--model=dfj", "a.tsp"]).expect("parse");
        let banner = options.to_string();
        assert!(banner.contains("model = dfj"));
        assert!(banner.contains("instance = a.tsp"));
    }
}
