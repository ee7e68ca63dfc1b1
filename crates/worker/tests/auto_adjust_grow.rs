// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use taskpool::{AutoAdjustConfig, Task, TaskPool, WorkerConfig};

#[test]
fn auto_adjust_grows_the_pool_under_sustained_queue_pressure() {
	let pool = TaskPool::new(WorkerConfig::new(3).with_limits(2, 8)).unwrap();
	pool.enable_auto_adjust(AutoAdjustConfig {
		high_watermark: 1,
		low_watermark: 1,
		adjust_interval: Duration::from_millis(500),
	})
	.unwrap();

	let completed = Arc::new(AtomicUsize::new(0));
	let completion = Arc::new((Mutex::new(0usize), Condvar::new()));
	let total = 12usize;

	for _ in 0..total {
		let sleep_ms = { rand::rng().random_range(300..=800) };
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

	let deadline = Instant::now() + Duration::from_secs(3);
	let mut grew = false;
	while Instant::now() < deadline {
		if pool.stats().thread_count > 3 {
			grew = true;
			break;
		}
		thread::sleep(Duration::from_millis(50));
	}
	assert!(grew, "auto-adjust did not grow the pool within 3 seconds of queue pressure");

	let (lock, cvar) = &*completion;
	let mut done = lock.lock().unwrap();
	while *done < total {
		let result = cvar.wait_timeout(done, Duration::from_secs(15)).unwrap();
		done = result.0;
		if result.1.timed_out() {
			panic!("timed out waiting for all tasks to complete; completed {done}/{total}");
		}
	}

	assert_eq!(completed.load(Ordering::SeqCst), total);
	pool.disable_auto_adjust().unwrap();
	pool.destroy().unwrap();
}
