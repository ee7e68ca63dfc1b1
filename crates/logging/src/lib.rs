// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

//! The logging collaborator the worker pool core treats as external: it emits
//! categorized, leveled diagnostics on the core's behalf and is configured
//! independently of it.
//!
//! `init()` recognizes the `LOG_LEVEL` environment variable described in the
//! spec's configuration surface (`FATAL`, `ERROR`, `WARN`, `INFO`, `DEBUG`,
//! `TRACE`, case-insensitive) and drives a `tracing-subscriber` `fmt` layer
//! from it. `tracing` has no `FATAL` level; it collapses onto `ERROR`, the
//! closest level available.

use std::env;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
const DEFAULT_LEVEL: &str = "INFO";

static INIT: Once = Once::new();

/// Maps a `LOG_LEVEL` value onto the `tracing` level name `EnvFilter`
/// understands. Unrecognized values fall back to `DEFAULT_LEVEL` rather than
/// failing init — a malformed environment should not prevent a process from
/// starting.
fn normalize_level(raw: &str) -> &'static str {
	match raw.to_ascii_uppercase().as_str() {
		"FATAL" | "ERROR" => "ERROR",
		"WARN" | "WARNING" => "WARN",
		"INFO" => "INFO",
		"DEBUG" => "DEBUG",
		"TRACE" => "TRACE",
		_ => DEFAULT_LEVEL,
	}
}

fn filter_directive() -> String {
	let level = env::var(LOG_LEVEL_VAR).map(|raw| normalize_level(&raw).to_string()).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
	format!("taskpool={level},taskpool_api={level},taskpool_logging={level}")
}

/// Installs the global `tracing` subscriber exactly once per process.
/// Safe to call from multiple call sites (library init, binary main,
/// doctest harnesses); later calls are no-ops.
pub fn init() {
	INIT.call_once(|| {
		let filter = EnvFilter::try_new(filter_directive()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
		let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_log_level_falls_back_to_default() {
		assert_eq!(normalize_level("bogus"), DEFAULT_LEVEL);
	}

	#[test]
	fn log_level_is_case_insensitive() {
		assert_eq!(normalize_level("debug"), "DEBUG");
		assert_eq!(normalize_level("Debug"), "DEBUG");
		assert_eq!(normalize_level("DEBUG"), "DEBUG");
	}

	#[test]
	fn fatal_collapses_to_error() {
		assert_eq!(normalize_level("FATAL"), "ERROR");
	}
}
