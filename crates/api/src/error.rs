// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use thiserror::Error;

/// Failure taxonomy for pool-mutating and pool-querying operations.
///
/// Variants correspond 1:1 to the error kinds a worker pool can surface:
/// invalid arguments, resource exhaustion, and state violations (submitting
/// to a shutting-down pool, a duplicate task name, enabling auto-adjust
/// before limits are coherent). `cancel_task_by_id`/`cancel_task_by_name`
/// use the narrower [`CancelError`] instead, since "not found" and "found but
/// running" are distinct, caller-actionable outcomes there.
#[derive(Debug, Error)]
pub enum PoolError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("resource exhausted: {0}")]
	ResourceExhausted(String),

	#[error("pool is shutting down or has already shut down")]
	AlreadyShuttingDown,

	#[error("a queued or running task already uses the name {0:?}")]
	DuplicateName(String),

	#[error("operation did not complete within the allotted time: {0}")]
	Unresponsive(String),
}

/// Outcome of a cancellation attempt.
///
/// `NotFound` and `NotCancellable` are kept distinct per spec: a task that
/// never existed (or was already completed/cancelled) is a different
/// situation from a task that exists but is currently running and therefore
/// cannot be cancelled.
#[derive(Debug, Error)]
pub enum CancelError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("no queued task matches the given key")]
	NotFound,

	#[error("task matches the given key but is currently running")]
	NotCancellable,
}
