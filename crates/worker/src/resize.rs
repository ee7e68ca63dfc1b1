// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::Arc;

use taskpool_api::PoolError;

use crate::slot::{EXITING_RESIZE_MARKER, WorkerSlot, WorkerStatus};
use crate::state::Inner;
use crate::worker;

/// Serializes against any other resize (explicit or auto-adjust-driven) via
/// `resize_lock`, which is strictly outer to `pool_lock`. Growth never
/// interrupts a running task; shrink only ever signals workers to exit
/// between tasks, a property this function relies on rather than enforces —
/// see [`shrink`].
pub(crate) fn resize_to(inner: &Arc<Inner>, target: usize) -> Result<(), PoolError> {
	let _resize_guard = inner.resize_lock.lock().unwrap();
	let current = inner.state.lock().unwrap().thread_count;
	if target > current {
		grow(inner, target)
	} else if target < current {
		shrink(inner, target);
		Ok(())
	} else {
		Ok(())
	}
}

/// Spawns workers one at a time until `target` is reached.
///
/// The slot is reserved — pushed, `idle_threads`/`thread_count`/`started`
/// bumped — *before* the thread is spawned, not after: a freshly spawned
/// worker locks `state` on its own and, if it wins the race against this
/// function's bookkeeping, must already see its own index counted in
/// `thread_count` with a slot to index into. Reserving first closes that
/// window; reserving after leaves one where the worker observes
/// `index >= thread_count`, takes the exiting branch, and indexes a slot
/// that was never pushed. On a spawn failure the reservation is rolled back,
/// leaving `thread_count` at however many workers are actually running.
fn grow(inner: &Arc<Inner>, target: usize) -> Result<(), PoolError> {
	loop {
		let index = {
			let mut state = inner.state.lock().unwrap();
			let index = state.thread_count;
			if index >= target {
				return Ok(());
			}
			state.workers.push(WorkerSlot::idle());
			state.idle_threads += 1;
			state.thread_count += 1;
			state.started += 1;
			index
		};

		match worker::spawn(inner.clone(), index) {
			Ok(handle) => inner.handles.lock().unwrap().push(handle),
			Err(err) => {
				let mut state = inner.state.lock().unwrap();
				state.workers.pop();
				state.idle_threads -= 1;
				state.thread_count -= 1;
				state.started -= 1;
				drop(state);
				tracing::error!(index, error = %err, "failed to spawn worker during resize");
				return Err(PoolError::ResourceExhausted(format!(
					"failed to spawn worker at index {index}: {err}"
				)));
			}
		}
	}
}

/// Publishes the new, smaller `thread_count` and wakes every worker blocked
/// on `queue_cv` so each re-evaluates whether its index has fallen out of
/// range. A worker mid-task only notices on its next loop iteration, after
/// the task returns — shrink never preempts in-flight work. Slots are left
/// in the backing `Vec`, addressable until `destroy` joins and releases them.
///
/// Retiring indices that are currently `Idle` are marked `ExitingResize` and
/// subtracted from `idle_threads` immediately, rather than left `Idle` until
/// the worker itself wakes up and notices: those workers will exit on their
/// next wakeup without ever running another task, so counting them as idle
/// in the meantime would let `stats()` observe `idle_threads > thread_count`.
/// Marking the status here (not just adjusting the counter) also makes the
/// worker's own eventual `exit` call a no-op against this count — its
/// `was_idle` check sees the slot already out of `Idle` and does not
/// subtract a second time. Busy slots are left untouched; they retire
/// through the normal post-task `exit` path once their task returns.
fn shrink(inner: &Arc<Inner>, target: usize) {
	{
		let mut state = inner.state.lock().unwrap();
		let thread_count = state.thread_count;
		let mut retiring_idle = 0usize;
		for slot in &mut state.workers[target..thread_count] {
			if slot.status == WorkerStatus::Idle {
				slot.status = WorkerStatus::ExitingResize;
				slot.current_name = EXITING_RESIZE_MARKER.to_string();
				retiring_idle += 1;
			}
		}
		state.idle_threads = state.idle_threads.saturating_sub(retiring_idle);
		state.thread_count = target;
	}
	inner.queue_cv.notify_all();
}
