// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

//! Tests for the recurring-schedule surface ([`Scheduler`]) on top of [`TaskPool`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskpool::{Priority, Scheduler, TaskPool, WorkerConfig};

#[test]
fn schedule_every_runs_repeatedly_until_cancelled() {
	taskpool_logging::init();
	let pool = TaskPool::new(WorkerConfig::new(2)).unwrap();

	let counter = Arc::new(AtomicUsize::new(0));
	let counter_clone = counter.clone();
	let handle = pool
		.schedule_every(Duration::from_millis(30), "interval_task", Priority::Normal, move || {
			counter_clone.fetch_add(1, Ordering::SeqCst);
		})
		.unwrap();

	let mut attempts = 0;
	while counter.load(Ordering::SeqCst) < 3 && attempts < 50 {
		thread::sleep(Duration::from_millis(10));
		attempts += 1;
	}
	assert!(counter.load(Ordering::SeqCst) >= 3, "schedule did not fire at least 3 times");

	handle.cancel();
	thread::sleep(Duration::from_millis(50));
	let count_after_cancel = counter.load(Ordering::SeqCst);
	thread::sleep(Duration::from_millis(100));
	assert_eq!(
		counter.load(Ordering::SeqCst),
		count_after_cancel,
		"schedule kept firing after the handle was cancelled"
	);

	pool.destroy().unwrap();
}
