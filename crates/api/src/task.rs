// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::any::Any;

use crate::{Priority, TaskId};

/// A task's argument, type-erased.
///
/// The C ancestor of this design passes a raw `void *` whose ownership
/// transfers from submitter to pool, then from pool to whichever of the task
/// function or the cancellation callback runs. `Box<dyn Any + Send>` is the
/// safe equivalent: it still moves, but the move is checked.
pub type TaskArg = Box<dyn Any + Send>;

/// The task's entry point, invoked by a worker with ownership of the argument.
pub type TaskFn = Box<dyn FnOnce(TaskArg) + Send>;

/// A cancellation callback, invoked by the pool with ownership of a queued
/// task's argument and its id when that task is cancelled before it runs.
pub type CancelFn = Box<dyn FnOnce(TaskArg, TaskId) + Send>;

/// A unit of work submitted to a pool.
///
/// Built with [`Task::new`] (typed argument + function) or [`Task::from_closure`]
/// (the common case: a closure that captures everything it needs, matching the
/// "wrap captured state in a closure taking no external argument" guidance for
/// applications that want strongly-typed state without threading a raw argument
/// through the pool). `name` and `priority` default to absent/`Normal` and are
/// set with the builder methods; the pool assigns the id and synthesizes a name
/// at submission time, not here.
pub struct Task {
	name: Option<String>,
	priority: Priority,
	argument: TaskArg,
	function: TaskFn,
}

impl Task {
	pub fn new<A, F>(argument: A, function: F) -> Self
	where
		A: Send + 'static,
		F: FnOnce(A) + Send + 'static,
	{
		Task {
			name: None,
			priority: Priority::default(),
			argument: Box::new(argument),
			function: Box::new(move |boxed: TaskArg| {
				let argument = *boxed
					.downcast::<A>()
					.unwrap_or_else(|_| panic!("task argument type mismatch at dispatch"));
				function(argument)
			}),
		}
	}

	/// Convenience constructor for a task that needs no external argument
	/// because its closure already owns everything it touches.
	pub fn from_closure<F>(function: F) -> Self
	where
		F: FnOnce() + Send + 'static,
	{
		Self::new((), move |()| function())
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_priority(mut self, priority: Priority) -> Self {
		self.priority = priority;
		self
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn priority(&self) -> Priority {
		self.priority
	}

	/// Consumes the task, handing its parts to the pool for scheduling.
	pub fn into_parts(self) -> (Option<String>, Priority, TaskArg, TaskFn) {
		(self.name, self.priority, self.argument, self.function)
	}
}
