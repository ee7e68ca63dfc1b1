// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskpool::{Task, TaskPool, WorkerConfig};

#[test]
fn cancelling_queued_tasks_invokes_the_callback_and_shrinks_the_queue() {
	let pool = TaskPool::new(WorkerConfig::new(2)).unwrap();

	let mut ids = Vec::new();
	for _ in 0..10 {
		let id = pool.submit(Task::from_closure(|| thread::sleep(Duration::from_secs(8)))).unwrap();
		ids.push(id);
	}

	thread::sleep(Duration::from_secs(1));
	let before = pool.stats().task_queue_size;

	let cancelled_count = Arc::new(AtomicUsize::new(0));
	for id in ids.iter().skip(2).take(5) {
		let cancelled_count = cancelled_count.clone();
		let callback: taskpool::CancelFn = Box::new(move |_argument, _id| {
			cancelled_count.fetch_add(1, Ordering::SeqCst);
		});
		pool.cancel_task_by_id(*id, Some(callback)).expect("task should still be queued and cancellable");
	}

	assert_eq!(cancelled_count.load(Ordering::SeqCst), 5);
	assert_eq!(pool.stats().task_queue_size, before - 5);

	// The two already-running tasks cannot be cancelled; they are left
	// to finish on their own rather than torn down mid-task.
	pool.destroy().unwrap();
}
