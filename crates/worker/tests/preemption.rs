// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use taskpool::{Priority, Task, TaskPool, WorkerConfig};

#[test]
fn high_priority_task_completes_before_background_task_it_queued_behind() {
	let pool = TaskPool::new(WorkerConfig::new(2)).unwrap();
	let finishes: Arc<Mutex<Vec<(&'static str, Instant)>>> = Arc::new(Mutex::new(Vec::new()));

	let record = |finishes: Arc<Mutex<Vec<(&'static str, Instant)>>>, label: &'static str| {
		move || {
			finishes.lock().unwrap().push((label, Instant::now()));
		}
	};

	let background_finishes = finishes.clone();
	pool.submit(
		Task::from_closure(move || {
			thread::sleep(Duration::from_millis(2000));
			record(background_finishes, "background")();
		})
		.with_priority(Priority::Background),
	)
	.unwrap();

	// Keep the second worker busy so the high-priority task actually has
	// to wait behind the background task's worker rather than just
	// running on the other idle one.
	pool.submit(Task::from_closure(|| thread::sleep(Duration::from_millis(1900))).with_priority(Priority::Background))
		.unwrap();

	thread::sleep(Duration::from_millis(100));

	let high_finishes = finishes.clone();
	pool.submit(
		Task::from_closure(move || {
			thread::sleep(Duration::from_millis(100));
			record(high_finishes, "high")();
		})
		.with_priority(Priority::High),
	)
	.unwrap();

	let normal_finishes = finishes.clone();
	pool.submit(
		Task::from_closure(move || {
			thread::sleep(Duration::from_millis(100));
			record(normal_finishes, "normal")();
		})
		.with_priority(Priority::Normal),
	)
	.unwrap();

	thread::sleep(Duration::from_millis(2500));

	let order = finishes.lock().unwrap();
	let high_at = order.iter().position(|(label, _)| *label == "high").expect("high task never ran");
	let background_at = order.iter().position(|(label, _)| *label == "background").expect("background task never ran");
	let normal_at = order.iter().position(|(label, _)| *label == "normal").expect("normal task never ran");
	assert!(high_at < background_at, "high-priority task did not complete before the background task");
	assert!(normal_at > high_at, "normal task did not complete after the high-priority task");

	pool.destroy().unwrap();
}
