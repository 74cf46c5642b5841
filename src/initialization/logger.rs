//! Logger backend initialization.
//!
//! Installs the process-wide `env_logger` backend behind the `log` facade.
//! Library code never logs through the facade directly; it receives a
//! `FacadeLogger` (see `crate::logging`) that forwards here.

use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Record};

use crate::config::{LogFormat, LOG_TARGET};
use crate::error_handling::InitializationError;

/// Driver modules and the most verbose level they may log at.
const QUIET_MODULES: [(&str, LevelFilter); 2] = [
    ("mongodb", LevelFilter::Warn),
    ("hickory_proto", LevelFilter::Error),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then applies to everything and wins for
/// this crate's own target. The MongoDB driver stays at `Warn` unless
/// `RUST_LOG` is more specific, since its connection-pool events are noisy.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Override with CLI args (takes precedence)
/// RUST_LOG=debug mongo_pipeline ping -c mongodb://localhost --log-level info
///
/// # One JSON object per line
/// mongo_pipeline load-batch ... --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, cap.min(level));
    }
    builder.filter_module(LOG_TARGET, level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.as_str();
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

/// One log record as a single-line JSON object.
fn json_line(record: &Record<'_>) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(
            &Record::builder()
                .args(format_args!("wrote \"people_1.json\"\nnext"))
                .level(Level::Warn)
                .target(LOG_TARGET)
                .build(),
        );
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], LOG_TARGET);
        assert_eq!(value["msg"], "wrote \"people_1.json\"\nnext");
        assert!(value["ts"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_init_logger_second_call_is_an_error_not_a_panic() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
