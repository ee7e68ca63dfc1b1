// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use rand::Rng;
use taskpool::{Task, TaskPool, WorkerConfig};

#[test]
fn grow_then_shrink_under_load() {
	let pool = TaskPool::new(WorkerConfig::new(4).with_limits(2, 8)).unwrap();

	let completed = Arc::new(AtomicUsize::new(0));
	let completion = Arc::new((Mutex::new(0usize), Condvar::new()));
	let total = 20usize;

	for _ in 0..total {
		let sleep_ms = { rand::rng().random_range(100..=500) };
		let completed = completed.clone();
		let completion = completion.clone();
		pool.submit(Task::from_closure(move || {
			thread::sleep(Duration::from_millis(sleep_ms));
			completed.fetch_add(1, Ordering::SeqCst);
			let (lock, cvar) = &*completion;
			*lock.lock().unwrap() += 1;
			cvar.notify_one();
		}))
		.unwrap();
	}

	pool.resize(6).unwrap();
	assert_eq!(pool.stats().thread_count, 6);

	pool.resize(3).unwrap();
	thread::sleep(Duration::from_millis(300));
	assert_eq!(pool.stats().thread_count, 3);

	let (lock, cvar) = &*completion;
	let mut done = lock.lock().unwrap();
	while *done < total {
		let result = cvar.wait_timeout(done, Duration::from_secs(10)).unwrap();
		done = result.0;
		if result.1.timed_out() {
			panic!("timed out waiting for tasks to complete after shrink; completed {done}/{total}");
		}
	}

	assert_eq!(completed.load(Ordering::SeqCst), total);
	pool.destroy().unwrap();
}
