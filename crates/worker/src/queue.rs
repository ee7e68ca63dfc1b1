// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use taskpool_api::{Priority, TaskArg, TaskFn, TaskId};

/// A task that has been accepted by the pool: identity and dispatch key
/// assigned, still owning its argument and entry point.
pub(crate) struct TaskRecord {
	pub id: TaskId,
	pub name: String,
	pub priority: Priority,
	pub seq: u64,
	pub argument: TaskArg,
	pub function: TaskFn,
}

/// Wraps a [`TaskRecord`] with `Ord` defined purely on its dispatch key
/// (priority, then submission sequence), so the record itself never needs to
/// implement comparison traits over its boxed closure/argument fields.
struct QueueEntry(TaskRecord);

impl QueueEntry {
	fn key(&self) -> (Priority, u64) {
		(self.0.priority, self.0.seq)
	}
}

impl PartialEq for QueueEntry {
	fn eq(&self, other: &Self) -> bool {
		self.key() == other.key()
	}
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for QueueEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		// BinaryHeap is a max-heap; dequeue order wants the smallest
		// (priority value, sequence) pair first, so invert: the entry
		// that should come out first must compare as `Greater`.
		let (self_priority, self_seq) = self.key();
		let (other_priority, other_seq) = other.key();
		match self_priority.cmp(&other_priority) {
			Ordering::Equal => other_seq.cmp(&self_seq),
			ord => ord.reverse(),
		}
	}
}

/// Ordered sequence of queued [`TaskRecord`]s: dequeue always returns the
/// smallest-priority-value record, breaking ties by submission order.
///
/// Backed by a binary heap for O(log n) enqueue/dequeue, one of the
/// acceptable implementations named in the spec alongside per-priority FIFO
/// sublists or a sorted linked list; the contract is the dequeue order, not
/// the container.
#[derive(Default)]
pub(crate) struct PriorityQueue {
	heap: BinaryHeap<QueueEntry>,
}

impl PriorityQueue {
	pub fn new() -> Self {
		Self { heap: BinaryHeap::new() }
	}

	pub fn len(&self) -> usize {
		self.heap.len()
	}

	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}

	pub fn enqueue(&mut self, record: TaskRecord) {
		self.heap.push(QueueEntry(record));
	}

	pub fn dequeue(&mut self) -> Option<TaskRecord> {
		self.heap.pop().map(|entry| entry.0)
	}

	pub fn find_by_name(&self, name: &str) -> Option<&TaskRecord> {
		self.heap.iter().map(|entry| &entry.0).find(|record| record.name == name)
	}

	pub fn find_by_id(&self, id: TaskId) -> Option<&TaskRecord> {
		self.heap.iter().map(|entry| &entry.0).find(|record| record.id == id)
	}

	pub fn remove_by_id(&mut self, id: TaskId) -> Option<TaskRecord> {
		self.remove_where(|record| record.id == id)
	}

	pub fn remove_by_name(&mut self, name: &str) -> Option<TaskRecord> {
		self.remove_where(|record| record.name == name)
	}

	fn remove_where(&mut self, pred: impl Fn(&TaskRecord) -> bool) -> Option<TaskRecord> {
		let mut found = None;
		let mut rest = BinaryHeap::with_capacity(self.heap.len());
		for entry in self.heap.drain() {
			if found.is_none() && pred(&entry.0) {
				found = Some(entry.0);
			} else {
				rest.push(entry);
			}
		}
		self.heap = rest;
		found
	}

	/// Discards every queued record without running it, for shutdown.
	/// Dropping the returned records drops their arguments and entry
	/// points normally (Rust never leaks memory here the way the C
	/// ancestor's raw-pointer arguments did); what is discarded is the
	/// *execution* of the task function, not the backing allocation.
	pub fn drain_all(&mut self) -> Vec<TaskRecord> {
		self.heap.drain().map(|entry| entry.0).collect()
	}
}
