//! Tracing subscriber setup.

use std::fmt;
use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Colored, compact output for interactive terminals.
    Tty,
    /// Plain text without color codes.
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Json when stderr is redirected, tty otherwise.
    pub fn detect() -> Self {
        if io::stderr().is_terminal() {
            LogFormat::Tty
        } else {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tty" => Ok(LogFormat::Tty),
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}. Use tty, text or json.", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Tty => write!(f, "tty"),
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Install the global subscriber. Logs go to stderr so reports on stdout stay clean.
pub fn init(level: &str, format: Option<LogFormat>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(level.to_lowercase())?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match format.unwrap_or_else(LogFormat::detect) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_ansi(false).try_init(),
        LogFormat::Tty => builder.compact().with_ansi(true).try_init(),
    }
}
