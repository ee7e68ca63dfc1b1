// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use taskpool_api::PoolError;

use crate::config::AutoAdjustConfig;
use crate::join::join_with_timeout;
use crate::resize;
use crate::state::Inner;

const DISABLE_JOIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// State guarded by `auto_adjust_lock`: whether a controller loop is
/// running, whether it has been asked to stop, its current parameters, and
/// its join handle. Disjoint from `PoolState`'s `auto_adjust` flag, which is
/// the pool-lock-guarded bit observers read; this is the controller's own
/// bookkeeping (spec §5: the two locks are never nested except to signal).
pub(crate) struct AutoAdjustState {
	pub running: bool,
	pub stopping: bool,
	pub config: AutoAdjustConfig,
	pub handle: Option<JoinHandle<()>>,
}

impl AutoAdjustState {
	pub fn disabled() -> Self {
		Self { running: false, stopping: false, config: AutoAdjustConfig::default(), handle: None }
	}
}

/// Enables the controller, or — if one is already running — updates its
/// parameters in place without restarting the loop, per spec §4.5.
pub(crate) fn enable(inner: &Arc<Inner>, config: AutoAdjustConfig) -> Result<(), PoolError> {
	{
		let state = inner.state.lock().unwrap();
		if state.shutdown {
			return Err(PoolError::AlreadyShuttingDown);
		}
		if state.min_threads == 0 || state.min_threads > state.max_threads {
			return Err(PoolError::InvalidArgument(
				"min_threads/max_threads must be coherent before enabling auto-adjust".to_string(),
			));
		}
	}

	let mut aa = inner.auto_adjust.lock().unwrap();
	aa.config = config;
	if aa.running {
		drop(aa);
		inner.auto_adjust_cv.notify_all();
		inner.state.lock().unwrap().auto_adjust = true;
		return Ok(());
	}

	aa.running = true;
	aa.stopping = false;
	let worker_inner = inner.clone();
	let handle = thread::Builder::new()
		.name("taskpool-auto-adjust".to_string())
		.spawn(move || run(worker_inner))
		.map_err(|err| PoolError::ResourceExhausted(err.to_string()))?;
	aa.handle = Some(handle);
	drop(aa);

	inner.state.lock().unwrap().auto_adjust = true;
	Ok(())
}

/// Disable protocol (spec §4.5): mark stopping, broadcast, join with a
/// bounded timeout, then reflect `auto_adjust = false` under `pool_lock`.
/// Idempotent — disabling an already-disabled controller is a no-op success.
pub(crate) fn disable(inner: &Arc<Inner>) -> Result<(), PoolError> {
	let handle = {
		let mut aa = inner.auto_adjust.lock().unwrap();
		if !aa.running {
			return Ok(());
		}
		aa.stopping = true;
		aa.running = false;
		aa.handle.take()
	};
	inner.auto_adjust_cv.notify_all();

	if let Some(handle) = handle {
		if join_with_timeout(handle, DISABLE_JOIN_TIMEOUT).is_err() {
			tracing::error!("auto-adjust controller did not stop within the disable timeout");
		}
	}

	inner.state.lock().unwrap().auto_adjust = false;
	Ok(())
}

/// Wakes the controller early. Called by `submit` and by a worker finishing
/// a task; both signals are advisory, since the controller always re-checks
/// watermarks under `pool_lock` before acting (spec §4.5 event triggers).
pub(crate) fn notify(inner: &Inner) {
	inner.auto_adjust_cv.notify_all();
}

fn run(inner: Arc<Inner>) {
	loop {
		let config = {
			// `interval`/`stopping` are read and the timed wait entered under
			// the same held guard: reacquiring the lock in between would open
			// a window where `disable`'s broadcast (taken under this same
			// lock) lands after the read but before the wait, and is lost
			// until the full interval elapses.
			let mut aa = inner.auto_adjust.lock().unwrap();
			if aa.stopping {
				return;
			}
			let interval = aa.config.adjust_interval;
			aa = inner.auto_adjust_cv.wait_timeout(aa, interval).unwrap().0;
			if aa.stopping {
				return;
			}
			aa.config
		};

		let (shutdown, thread_count, queue_size, idle_threads, min_threads, max_threads) = {
			let state = inner.state.lock().unwrap();
			(
				state.shutdown,
				state.thread_count,
				state.queue.len(),
				state.idle_threads,
				state.min_threads,
				state.max_threads,
			)
		};
		if shutdown {
			return;
		}

		let mut target = thread_count;
		if queue_size > config.high_watermark && thread_count < max_threads {
			target = thread_count + 1;
		} else if idle_threads > config.low_watermark && thread_count > min_threads {
			target = thread_count - 1;
		}
		target = target.clamp(min_threads, max_threads);

		if target != thread_count {
			tracing::debug!(from = thread_count, to = target, queue_size, idle_threads, "auto-adjust resizing pool");
			if let Err(err) = resize::resize_to(&inner, target) {
				tracing::warn!(error = %err, "auto-adjust resize attempt failed");
			}
		}
	}
}
