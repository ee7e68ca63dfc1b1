// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::time::Duration;

/// Construction-time configuration for a [`crate::TaskPool`].
///
/// `min_threads`/`max_threads` default to `1` and `2 * num_threads`
/// respectively, the bounds the create operation establishes when no
/// explicit limits are given; use [`WorkerConfig::with_limits`] to override
/// them before constructing the pool.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
	pub num_threads: usize,
	pub min_threads: usize,
	pub max_threads: usize,
}

impl WorkerConfig {
	pub fn new(num_threads: usize) -> Self {
		Self { num_threads, min_threads: 1, max_threads: num_threads.max(1) * 2 }
	}

	pub fn with_limits(mut self, min_threads: usize, max_threads: usize) -> Self {
		self.min_threads = min_threads;
		self.max_threads = max_threads;
		self
	}
}

impl Default for WorkerConfig {
	fn default() -> Self {
		Self::new(4)
	}
}

/// Parameters for the auto-adjust controller (spec §4.5).
#[derive(Debug, Clone, Copy)]
pub struct AutoAdjustConfig {
	/// Queue-length threshold above which the controller proposes growth.
	pub high_watermark: usize,
	/// Idle-worker threshold above which the controller proposes shrink.
	pub low_watermark: usize,
	/// How often the controller wakes up to re-evaluate, absent an event signal.
	pub adjust_interval: Duration,
}

impl Default for AutoAdjustConfig {
	fn default() -> Self {
		Self { high_watermark: 10, low_watermark: 1, adjust_interval: Duration::from_millis(500) }
	}
}
