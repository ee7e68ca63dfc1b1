// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::fmt;
use std::num::NonZeroU64;

/// Identity of a submitted task, unique within its pool's lifetime.
///
/// Zero is reserved to mean "no task" in the C ancestor of this design; here
/// that's expressed by construction via `NonZeroU64` rather than by
/// convention, so `Option<TaskId>` is the idiomatic "maybe no task" value and
/// carries no extra storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(NonZeroU64);

impl TaskId {
	/// Constructs a `TaskId` from a raw value. Panics if `raw` is zero;
	/// only the pool's identity generator should call this.
	pub fn from_raw(raw: u64) -> Self {
		Self(NonZeroU64::new(raw).expect("task id generator must never emit zero"))
	}

	pub fn get(self) -> u64 {
		self.0.get()
	}
}

impl fmt::Display for TaskId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}
