// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::atomic::Ordering;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use taskpool_api::{CancelError, CancelFn, PoolError, Priority, ScheduleHandle, Scheduler, Subsystem, Task, TaskId};

use crate::auto_adjust::{self, AutoAdjustState};
use crate::config::{AutoAdjustConfig, WorkerConfig};
use crate::join::join_with_timeout;
use crate::queue::{PriorityQueue, TaskRecord};
use crate::resize;
use crate::slot::WorkerStatus;
use crate::state::{Inner, PoolState};
use crate::stats::{PoolStats, TaskLookup};

/// How long `destroy` waits on each worker join before giving up on it and
/// logging rather than blocking forever (see [`crate::join::join_with_timeout`]).
const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A priority-ordered, auto-resizing in-process worker thread pool.
///
/// Cloning a `TaskPool` shares the same underlying workers and queue — it is
/// a handle, not a copy, matching the "opaque handle with internal locks"
/// pattern: interior state lives behind `Arc` and the three locks described
/// in the crate's concurrency model, so every clone can submit, query, and
/// tear the pool down without the caller ever touching uninitialized memory.
#[derive(Clone)]
pub struct TaskPool {
	inner: Arc<Inner>,
}

impl TaskPool {
	/// Creates a pool and eagerly spawns `config.num_threads` workers.
	/// On any resource failure, every worker that did start is torn down
	/// and the failure is returned; no partial pool is ever handed back.
	pub fn new(config: WorkerConfig) -> Result<Self, PoolError> {
		if config.num_threads == 0 {
			return Err(PoolError::InvalidArgument("num_threads must be positive".to_string()));
		}
		if config.min_threads == 0 || config.min_threads > config.max_threads {
			return Err(PoolError::InvalidArgument(
				"min_threads must be positive and no greater than max_threads".to_string(),
			));
		}
		if config.num_threads < config.min_threads || config.num_threads > config.max_threads {
			return Err(PoolError::InvalidArgument(format!(
				"num_threads {} outside configured range [{}, {}]",
				config.num_threads, config.min_threads, config.max_threads
			)));
		}

		let state = PoolState {
			workers: Vec::new(),
			thread_count: 0,
			min_threads: config.min_threads,
			max_threads: config.max_threads,
			idle_threads: 0,
			queue: PriorityQueue::new(),
			started: 0,
			shutdown: false,
			auto_adjust: false,
			next_id: 1,
			next_seq: 0,
		};
		let inner = Arc::new(Inner {
			resize_lock: Mutex::new(()),
			state: Mutex::new(state),
			queue_cv: Condvar::new(),
			auto_adjust: Mutex::new(AutoAdjustState::disabled()),
			auto_adjust_cv: Condvar::new(),
			handles: Mutex::new(Vec::new()),
		});

		match resize::resize_to(&inner, config.num_threads) {
			Ok(()) => Ok(TaskPool { inner }),
			Err(err) => {
				let pool = TaskPool { inner };
				let _ = pool.destroy();
				Err(err)
			}
		}
	}

	#[tracing::instrument(level = "trace", skip(self, task), fields(priority))]
	pub fn submit(&self, task: Task) -> Result<TaskId, PoolError> {
		let (name_opt, priority, argument, function) = task.into_parts();
		tracing::Span::current().record("priority", tracing::field::debug(priority));

		let id;
		let signal_auto_adjust;
		{
			let mut state = self.inner.state.lock().unwrap();
			if state.shutdown {
				return Err(PoolError::AlreadyShuttingDown);
			}
			if let Some(name) = name_opt.as_deref() {
				if state.queue.find_by_name(name).is_some() || running_task_with_name(&state, name) {
					return Err(PoolError::DuplicateName(name.to_string()));
				}
			}

			let raw_id = state.next_id;
			state.next_id += 1;
			let seq = state.next_seq;
			state.next_seq += 1;
			id = TaskId::from_raw(raw_id);
			let name = name_opt.unwrap_or_else(|| format!("unnamed_task_{raw_id}"));
			tracing::trace!(task_id = %id, %name, "task submitted");
			state.queue.enqueue(TaskRecord { id, name, priority, seq, argument, function });
			signal_auto_adjust = state.auto_adjust;
		}

		self.inner.queue_cv.notify_one();
		if signal_auto_adjust {
			auto_adjust::notify(&self.inner);
		}
		Ok(id)
	}

	pub fn set_limits(&self, min_threads: usize, max_threads: usize) -> Result<(), PoolError> {
		if min_threads == 0 || min_threads > max_threads {
			return Err(PoolError::InvalidArgument(
				"min_threads must be positive and no greater than max_threads".to_string(),
			));
		}
		let current = {
			let mut state = self.inner.state.lock().unwrap();
			if state.shutdown {
				return Err(PoolError::AlreadyShuttingDown);
			}
			state.min_threads = min_threads;
			state.max_threads = max_threads;
			state.thread_count
		};
		if current < min_threads {
			self.resize(min_threads)
		} else if current > max_threads {
			self.resize(max_threads)
		} else {
			Ok(())
		}
	}

	pub fn resize(&self, target: usize) -> Result<(), PoolError> {
		let (min, max, shutdown) = {
			let state = self.inner.state.lock().unwrap();
			(state.min_threads, state.max_threads, state.shutdown)
		};
		if shutdown {
			return Err(PoolError::AlreadyShuttingDown);
		}
		if target < min || target > max {
			return Err(PoolError::InvalidArgument(format!(
				"resize target {target} outside configured range [{min}, {max}]"
			)));
		}
		resize::resize_to(&self.inner, target)
	}

	pub fn stats(&self) -> PoolStats {
		let state = self.inner.state.lock().unwrap();
		PoolStats {
			thread_count: state.thread_count,
			min_threads: state.min_threads,
			max_threads: state.max_threads,
			idle_threads: state.idle_threads,
			task_queue_size: state.queue.len(),
			started: state.started,
		}
	}

	/// Snapshot of each worker's current task name, in slot-index order,
	/// length equal to `thread_count` at the moment of the call. Owned
	/// independently of the pool the instant this returns.
	pub fn running_task_names(&self) -> Vec<String> {
		let state = self.inner.state.lock().unwrap();
		state.workers.iter().take(state.thread_count).map(|slot| slot.current_name.clone()).collect()
	}

	pub fn find_task_by_id(&self, id: TaskId) -> Option<TaskLookup> {
		let state = self.inner.state.lock().unwrap();
		if state.queue.find_by_id(id).is_some() {
			return Some(TaskLookup::Queued);
		}
		state
			.workers
			.iter()
			.take(state.thread_count)
			.any(|slot| slot.status == WorkerStatus::Busy && slot.current_task == Some(id))
			.then_some(TaskLookup::Running)
	}

	pub fn find_task_by_name(&self, name: &str) -> Option<(TaskId, TaskLookup)> {
		let state = self.inner.state.lock().unwrap();
		if let Some(record) = state.queue.find_by_name(name) {
			return Some((record.id, TaskLookup::Queued));
		}
		state.workers.iter().take(state.thread_count).find_map(|slot| {
			(slot.status == WorkerStatus::Busy && slot.current_name == name)
				.then(|| slot.current_task.map(|id| (id, TaskLookup::Running)))
				.flatten()
		})
	}

	pub fn cancel_task_by_id(&self, id: TaskId, cancel_cb: Option<CancelFn>) -> Result<(), CancelError> {
		let record = {
			let mut state = self.inner.state.lock().unwrap();
			match state.queue.remove_by_id(id) {
				Some(record) => record,
				None => {
					let running = state
						.workers
						.iter()
						.take(state.thread_count)
						.any(|slot| slot.status == WorkerStatus::Busy && slot.current_task == Some(id));
					return Err(if running { CancelError::NotCancellable } else { CancelError::NotFound });
				}
			}
		};
		finish_cancel(record, cancel_cb)
	}

	pub fn cancel_task_by_name(&self, name: &str, cancel_cb: Option<CancelFn>) -> Result<(), CancelError> {
		if name.is_empty() {
			return Err(CancelError::InvalidArgument("task name must not be empty".to_string()));
		}
		let record = {
			let mut state = self.inner.state.lock().unwrap();
			match state.queue.remove_by_name(name) {
				Some(record) => record,
				None => {
					let running = running_task_with_name(&state, name);
					return Err(if running { CancelError::NotCancellable } else { CancelError::NotFound });
				}
			}
		};
		finish_cancel(record, cancel_cb)
	}

	pub fn enable_auto_adjust(&self, config: AutoAdjustConfig) -> Result<(), PoolError> {
		auto_adjust::enable(&self.inner, config)
	}

	pub fn disable_auto_adjust(&self) -> Result<(), PoolError> {
		auto_adjust::disable(&self.inner)
	}

	/// The complete shutdown protocol (spec §4.3): disables auto-adjust,
	/// publishes `shutdown = true`, rebroadcasts a few times to close the
	/// race window against workers about to re-wait, joins every worker
	/// with a bounded timeout, and discards whatever is left in the
	/// queue. Idempotent and best-effort: a second call on an
	/// already-destroyed pool returns `Ok(())` without re-joining.
	pub fn destroy(&self) -> Result<(), PoolError> {
		auto_adjust::disable(&self.inner)?;

		{
			let mut state = self.inner.state.lock().unwrap();
			if state.shutdown {
				return Ok(());
			}
			renormalize_idle(&mut state);
			state.shutdown = true;
		}
		self.inner.queue_cv.notify_all();

		for _ in 0..3 {
			thread::sleep(Duration::from_millis(20));
			self.inner.queue_cv.notify_all();
		}

		let handles = std::mem::take(&mut *self.inner.handles.lock().unwrap());
		for handle in handles {
			if join_with_timeout(handle, SHUTDOWN_JOIN_TIMEOUT).is_err() {
				tracing::error!(
					"a worker did not stop within the shutdown timeout; it keeps running until its current task returns"
				);
			}
		}

		self.inner.state.lock().unwrap().queue.drain_all();
		Ok(())
	}
}

impl Subsystem for TaskPool {
	/// Construction already starts the workers eagerly, so `start` exists
	/// only so code generic over `Subsystem` can drive a `TaskPool` the
	/// same way as any other subsystem; it is a no-op success whenever
	/// the pool is already running (always, outside of having been
	/// destroyed).
	fn start(&mut self) -> Result<(), PoolError> {
		if self.inner.state.lock().unwrap().shutdown {
			return Err(PoolError::AlreadyShuttingDown);
		}
		Ok(())
	}

	fn shutdown(&mut self) -> Result<(), PoolError> {
		self.destroy()
	}

	fn is_running(&self) -> bool {
		!self.inner.state.lock().unwrap().shutdown
	}
}

impl Scheduler for TaskPool {
	fn schedule_every<F>(
		&self,
		interval: Duration,
		name: impl Into<String>,
		priority: Priority,
		job: F,
	) -> Result<ScheduleHandle, PoolError>
	where
		F: Fn() + Send + Sync + 'static,
	{
		let name = name.into();
		let (handle, cancelled) = ScheduleHandle::new();
		let inner = self.inner.clone();
		let job = Arc::new(job);

		thread::Builder::new()
			.name(format!("taskpool-schedule-{name}"))
			.spawn(move || {
				let pool = TaskPool { inner };
				let mut tick: u64 = 0;
				loop {
					thread::sleep(interval);
					if cancelled.load(Ordering::SeqCst) {
						return;
					}
					if !pool.is_running() {
						return;
					}
					tick += 1;
					let job = job.clone();
					let task = Task::from_closure(move || job()).named(format!("{name}_{tick}")).with_priority(priority);
					if pool.submit(task).is_err() {
						return;
					}
				}
			})
			.map_err(|err| PoolError::ResourceExhausted(err.to_string()))?;

		Ok(handle)
	}
}

fn running_task_with_name(state: &PoolState, name: &str) -> bool {
	state.workers.iter().take(state.thread_count).any(|slot| slot.status == WorkerStatus::Busy && slot.current_name == name)
}

fn renormalize_idle(state: &mut PoolState) {
	let actual = state.workers.iter().take(state.thread_count).filter(|slot| slot.status == WorkerStatus::Idle).count();
	if actual != state.idle_threads {
		tracing::warn!(recorded = state.idle_threads, actual, "idle_threads drifted from worker statuses; correcting before shutdown");
		state.idle_threads = actual;
	}
}

fn finish_cancel(record: TaskRecord, cancel_cb: Option<CancelFn>) -> Result<(), CancelError> {
	tracing::debug!(task_id = %record.id, task_name = %record.name, "task cancelled before dispatch");
	if let Some(cb) = cancel_cb {
		cb(record.argument, record.id);
	}
	Ok(())
}
