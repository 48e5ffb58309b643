use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle};
use log::Level;

use crate::{
    Error, Result,
    io::options::{LogFormat, PlannerOptions},
};

/// Installs the global logger described by `options`. Fails if a logger is
/// already installed.
pub fn init_logger(options: &PlannerOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            writeln!(
                buf,
                "{}{}",
                line_prefix(log_format, record.level(), record.target()),
                record.args()
            )
        });

    let target = match options.log_output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!(
                    "failed to create log output file {}: {e}",
                    path.display()
                ))
            })?;
            Target::Pipe(Box::new(file))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

/// Level tag, plus the module path below the crate root in pretty mode.
fn line_prefix(format: LogFormat, level: Level, target: &str) -> String {
    match format {
        LogFormat::Compact => format!("{level} "),
        LogFormat::Pretty => {
            let module = target
                .split_once("::")
                .map_or(target, |(_, rest)| rest);
            format!("{level:<5} [{module}] ")
        }
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::line_prefix;
    use crate::LogFormat;

    #[test]
    fn compact_prefix_is_just_the_level() {
        assert_eq!(
            line_prefix(LogFormat::Compact, Level::Warn, "planner_core::plan::search"),
            "WARN "
        );
    }

    #[test]
    fn pretty_prefix_drops_crate_name() {
        assert_eq!(
            line_prefix(LogFormat::Pretty, Level::Info, "planner_core::plan::search"),
            "INFO  [plan::search] "
        );
        assert_eq!(
            line_prefix(LogFormat::Pretty, Level::Debug, "coverage_planner"),
            "DEBUG [coverage_planner] "
        );
    }
}
