use std::{fs::File, io::Write};

use env_logger::{Builder, Target, fmt::Formatter};
use log::Record;

use crate::Result;
use crate::options::{LogFormat, SolverOptions};

/// Installs the process-wide logger configured by the CLI options:
/// level filter, compact or pretty lines, optional timestamps, and a
/// stderr-or-file target.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .format(move |buf, record| write_record(buf, record, log_format, log_timestamp))
        .target(log_target(options)?);

    builder
        .try_init()
        .map_err(|e| crate::Error::other(format!("logger init failed: {e}")))
}

fn write_record(
    buf: &mut Formatter,
    record: &Record<'_>,
    log_format: LogFormat,
    log_timestamp: bool,
) -> std::io::Result<()> {
    if log_timestamp {
        write!(buf, "{} ", buf.timestamp_millis())?;
    }

    match log_format {
        LogFormat::Compact => writeln!(buf, "{} {}", record.level(), record.args()),
        LogFormat::Pretty => writeln!(
            buf,
            "{} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        ),
    }
}

fn log_target(options: &SolverOptions) -> Result<Target> {
    let Some(log_path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };

    let log_file = File::create(log_path).map_err(|e| {
        crate::Error::other(format!(
            "failed to create log output file {}: {e}",
            log_path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(log_file)))
}
