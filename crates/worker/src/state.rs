// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::{Condvar, Mutex};
use std::thread::JoinHandle;

use crate::auto_adjust::AutoAdjustState;
use crate::queue::PriorityQueue;
use crate::slot::WorkerSlot;

/// Everything guarded by `pool_lock`: worker slots, the queue, limits,
/// counters, and the identity generator.
///
/// Invariants maintained by every mutator (checked in tests, not enforced by
/// the type system): `idle_threads <= thread_count`, `task_queue_size ==
/// queue.len()`, `min_threads <= thread_count <= max_threads`.
pub(crate) struct PoolState {
	pub workers: Vec<WorkerSlot>,
	pub thread_count: usize,
	pub min_threads: usize,
	pub max_threads: usize,
	pub idle_threads: usize,
	pub queue: PriorityQueue,
	pub started: u64,
	pub shutdown: bool,
	pub auto_adjust: bool,
	pub next_id: u64,
	pub next_seq: u64,
}

/// The pool's shared interior, owned by every clone of the public `TaskPool`
/// handle through an `Arc`. Lock acquisition order, outer to inner, matches
/// spec §5 exactly and must never be taken in reverse:
///
/// 1. `resize_lock` — serializes grow/shrink; may be held while acquiring `state`.
/// 2. `state` (`pool_lock`) — worker slots, queue, counters, mode flags.
/// 3. `auto_adjust` (`auto_adjust_lock`) — the controller's own condition state;
///    `state` must never be held while acquiring this one except to signal and
///    release immediately.
pub(crate) struct Inner {
	pub resize_lock: Mutex<()>,
	pub state: Mutex<PoolState>,
	pub queue_cv: Condvar,
	pub auto_adjust: Mutex<AutoAdjustState>,
	pub auto_adjust_cv: Condvar,
	pub handles: Mutex<Vec<JoinHandle<()>>>,
}
