// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::auto_adjust;
use crate::queue::TaskRecord;
use crate::slot::{EXITING_RESIZE_MARKER, EXITING_SHUTDOWN_MARKER, IDLE_MARKER, WorkerStatus};
use crate::state::Inner;

/// Workers poll their own `queue_cv` wait with a bounded timeout rather than
/// relying solely on being woken: a missed or coalesced notify must never
/// strand a worker indefinitely.
const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) fn spawn(inner: Arc<Inner>, index: usize) -> std::io::Result<JoinHandle<()>> {
	thread::Builder::new().name(format!("taskpool-worker-{index}")).spawn(move || run(inner, index))
}

fn run(inner: Arc<Inner>, index: usize) {
	loop {
		let record = match next_record(&inner, index) {
			Some(record) => record,
			None => return,
		};

		let TaskRecord { id, name, argument, function, .. } = record;
		let outcome = panic::catch_unwind(AssertUnwindSafe(|| function(argument)));
		if outcome.is_err() {
			tracing::error!(task_id = %id, task_name = %name, "task panicked; treated as completed for accounting");
		}

		let signal_auto_adjust = {
			let mut state = inner.state.lock().unwrap();
			let slot = &mut state.workers[index];
			slot.status = WorkerStatus::Idle;
			slot.current_name = IDLE_MARKER.to_string();
			slot.current_task = None;
			state.idle_threads += 1;
			state.auto_adjust
		};
		if signal_auto_adjust {
			auto_adjust::notify(&inner);
		}
	}
}

/// Blocks (with a bounded timed wait, tolerating spurious and missed
/// wakeups) until either a task is ready to dispatch or this worker should
/// exit, returning `None` in the latter case.
fn next_record(inner: &Arc<Inner>, index: usize) -> Option<TaskRecord> {
	let mut state = inner.state.lock().unwrap();
	loop {
		if state.shutdown && state.queue.is_empty() {
			exit(&mut state, index, WorkerStatus::ExitingShutdown);
			return None;
		}
		if index >= state.thread_count {
			exit(&mut state, index, WorkerStatus::ExitingResize);
			return None;
		}
		if let Some(record) = state.queue.dequeue() {
			let was_idle = state.workers[index].status == WorkerStatus::Idle;
			if was_idle {
				state.idle_threads = state.idle_threads.saturating_sub(1);
			}
			let slot = &mut state.workers[index];
			slot.status = WorkerStatus::Busy;
			slot.current_name = record.name.clone();
			slot.current_task = Some(record.id);
			return Some(record);
		}

		state = inner.queue_cv.wait_timeout(state, WAIT_TIMEOUT).unwrap().0;
	}
}

fn exit(state: &mut crate::state::PoolState, index: usize, status: WorkerStatus) {
	let was_idle = state.workers[index].status == WorkerStatus::Idle;
	if was_idle {
		state.idle_threads = state.idle_threads.saturating_sub(1);
	}
	let slot = &mut state.workers[index];
	slot.status = status;
	slot.current_task = None;
	slot.current_name = match status {
		WorkerStatus::ExitingResize => EXITING_RESIZE_MARKER.to_string(),
		WorkerStatus::ExitingShutdown => EXITING_SHUTDOWN_MARKER.to_string(),
		WorkerStatus::Idle | WorkerStatus::Busy => slot.current_name.clone(),
	};
}
