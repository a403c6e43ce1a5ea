//! Diagnostic logging setup.
//!
//! The terminal UI owns the screen, so in chat mode log records go to a file
//! (or nowhere). One-shot subcommands log to stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const FILE_FILTER: &str = "info";
const STDERR_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LogTarget {
    /// Where logs should go for an interactive session.
    pub fn for_tui(log_file: Option<PathBuf>) -> Self {
        log_file.map(LogTarget::File).unwrap_or(LogTarget::Discard)
    }

    /// Where logs should go for a one-shot command.
    pub fn for_command(log_file: Option<PathBuf>) -> Self {
        log_file.map(LogTarget::File).unwrap_or(LogTarget::Stderr)
    }

    fn default_filter(&self) -> &'static str {
        match self {
            LogTarget::File(_) => FILE_FILTER,
            LogTarget::Stderr | LogTarget::Discard => STDERR_FILTER,
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_logging(target: LogTarget) -> Result<(), Box<dyn std::error::Error>> {
    let filter = env_filter(target.default_filter());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match target {
        LogTarget::Discard => return Ok(()),
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    result.map_err(|e| -> Box<dyn std::error::Error> { e })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tui_never_logs_to_the_terminal() {
        assert_eq!(LogTarget::for_tui(None), LogTarget::Discard);
        assert_eq!(
            LogTarget::for_tui(Some(PathBuf::from("chat.log"))),
            LogTarget::File(PathBuf::from("chat.log"))
        );
    }

    #[test]
    fn commands_default_to_stderr() {
        assert_eq!(LogTarget::for_command(None), LogTarget::Stderr);
        assert_eq!(LogTarget::Stderr.default_filter(), "warn");
        assert_eq!(
            LogTarget::File(PathBuf::from("x.log")).default_filter(),
            "info"
        );
    }

    #[test]
    fn discard_installs_nothing() {
        assert!(init_logging(LogTarget::Discard).is_ok());
    }
}
