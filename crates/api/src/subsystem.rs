// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{PoolError, Priority};

/// Lifecycle surface shared by every in-process subsystem in this workspace.
///
/// A worker pool implements this in addition to its own constructor-time
/// eager start, so that code generic over "a subsystem" (supervisors,
/// health-check loops) can drive it the same way regardless of what kind of
/// subsystem it is.
pub trait Subsystem {
	/// Starts the subsystem. Idempotent: calling `start` on an
	/// already-running subsystem is a no-op success.
	fn start(&mut self) -> Result<(), PoolError>;

	/// Stops the subsystem, releasing its resources. Idempotent.
	fn shutdown(&mut self) -> Result<(), PoolError>;

	fn is_running(&self) -> bool;
}

/// A subsystem capable of running a job repeatedly on a fixed interval.
///
/// Takes a factory closure rather than a single [`crate::Task`]: a `Task`'s
/// function is `FnOnce`, consumed the first time it runs, so a genuinely
/// recurring schedule needs something re-invocable. `job` is called once per
/// tick to build the work for that tick, each submitted under a tick-qualified
/// name so repeated submissions never collide with the uniqueness check on an
/// in-flight previous tick.
pub trait Scheduler {
	fn schedule_every<F>(
		&self,
		interval: Duration,
		name: impl Into<String>,
		priority: Priority,
		job: F,
	) -> Result<ScheduleHandle, PoolError>
	where
		F: Fn() + Send + Sync + 'static;
}

/// A handle to a recurring scheduled task.
///
/// Dropping the handle does not stop the schedule; call [`ScheduleHandle::cancel`]
/// explicitly, mirroring the pool's general rule that cancellation is always
/// an explicit act, never an accident of scope.
#[derive(Clone)]
pub struct ScheduleHandle {
	cancelled: Arc<AtomicBool>,
}

impl ScheduleHandle {
	pub fn new() -> (Self, Arc<AtomicBool>) {
		let cancelled = Arc::new(AtomicBool::new(false));
		(Self { cancelled: cancelled.clone() }, cancelled)
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}
