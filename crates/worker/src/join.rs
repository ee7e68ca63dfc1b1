// Copyright (c) taskpool contributors 2026
// This file is licensed under the Apache-2.0 license

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Joins `handle` but gives up waiting after `timeout`.
///
/// Safe Rust has no equivalent of `pthread_cancel`: a worker that is truly
/// stuck (a user task that never returns) cannot be forced to stop. What we
/// can do, and what this does, is stop *blocking the caller* — the join is
/// handed to a detached watcher thread that will complete it whenever the
/// target actually finishes, while this function returns `Err` so the caller
/// (shutdown, or auto-adjust disable) can log the condition and move on
/// rather than hang forever on a single unresponsive worker.
pub(crate) fn join_with_timeout(handle: JoinHandle<()>, timeout: Duration) -> Result<(), ()> {
	let (tx, rx) = mpsc::channel();
	thread::spawn(move || {
		let _ = handle.join();
		let _ = tx.send(());
	});
	rx.recv_timeout(timeout).map_err(|_| ())
}
