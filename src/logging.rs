//! Process-wide `tracing` subscriber setup.
//!
//! Library code only emits events; the binary decides where they go by
//! calling [`initialize`] once at startup.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::Level;

/// Verbosity accepted from configuration and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	/// Raise the level by `steps`, saturating at [`LogLevel::Trace`].
	#[must_use]
	pub fn raised_by(self, steps: u8) -> Self {
		let order = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];
		let current = order.iter().position(|level| *level == self).unwrap_or(1);
		let target = (current + usize::from(steps)).min(order.len() - 1);
		order[target]
	}

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Error => "error",
			Self::Warn => "warn",
			Self::Info => "info",
			Self::Debug => "debug",
			Self::Trace => "trace",
		}
	}

	fn as_tracing(self) -> Level {
		match self {
			Self::Error => Level::ERROR,
			Self::Warn => Level::WARN,
			Self::Info => Level::INFO,
			Self::Debug => Level::DEBUG,
			Self::Trace => Level::TRACE,
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"error" => Ok(Self::Error),
			"warn" | "warning" => Ok(Self::Warn),
			"info" => Ok(Self::Info),
			"debug" => Ok(Self::Debug),
			"trace" => Ok(Self::Trace),
			other => Err(format!("unknown log level '{other}'")),
		}
	}
}

/// Install a stderr `fmt` subscriber at `level`.
///
/// Calling this more than once is harmless; only the first call installs a
/// subscriber.
pub fn initialize(level: LogLevel) {
	let _ = tracing_subscriber::fmt()
		.with_max_level(level.as_tracing())
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}
