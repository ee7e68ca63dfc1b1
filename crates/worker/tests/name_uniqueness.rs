// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use taskpool::{PoolError, Task, TaskLookup, TaskPool, WorkerConfig};

#[test]
fn resubmitting_a_queued_name_fails_with_duplicate_name() {
	let pool = TaskPool::new(WorkerConfig::new(2)).unwrap();
	let release = Arc::new((Mutex::new(false), Condvar::new()));

	// Keep both workers occupied so the first "taskA" stays queued
	// rather than immediately dispatched.
	for _ in 0..2 {
		let release = release.clone();
		pool.submit(Task::from_closure(move || {
			let (lock, cvar) = &*release;
			let mut go = lock.lock().unwrap();
			while !*go {
				go = cvar.wait(go).unwrap();
			}
		}))
		.unwrap();
	}

	let first_id = pool.submit(Task::from_closure(|| {}).named("taskA")).unwrap();

	let second = pool.submit(Task::from_closure(|| {}).named("taskA"));
	assert!(matches!(second, Err(PoolError::DuplicateName(name)) if name == "taskA"));

	assert_eq!(pool.find_task_by_id(first_id), Some(TaskLookup::Queued));
	assert_eq!(pool.find_task_by_name("taskA").map(|(id, lookup)| (id, lookup)), Some((first_id, TaskLookup::Queued)));

	{
		let (lock, cvar) = &*release;
		*lock.lock().unwrap() = true;
		cvar.notify_all();
	}
	thread::sleep(Duration::from_millis(200));

	pool.destroy().unwrap();
}
