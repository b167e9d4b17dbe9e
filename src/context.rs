//! Caller contexts and the bounded scopes derived from them.
//!
//! A [`Context`] carries the caller's cancellation token and optional deadline by value into
//! every exchange. [`Context::bounded`] composes that ambient deadline with a fixed timeout
//! into a [`BoundedScope`] whose deadline is [`effective_deadline`]. Cancellation only flows
//! downward: cancelling a scope never cancels the context it was derived from.

// self
use crate::_prelude::*;

/// Returns the earlier of the ambient deadline and `now + timeout`.
pub fn effective_deadline(ambient: Option<Instant>, now: Instant, timeout: StdDuration) -> Instant {
	let bound = now + timeout;

	match ambient {
		Some(deadline) if deadline < bound => deadline,
		_ => bound,
	}
}

/// Ambient cancellation and deadline supplied by the caller of a request.
#[derive(Clone, Debug, Default)]
pub struct Context {
	cancel: CancellationToken,
	deadline: Option<Instant>,
}
impl Context {
	/// Context that is never cancelled and has no deadline.
	pub fn background() -> Self {
		Self::default()
	}

	/// Tightens the deadline; a later deadline than the current one is ignored.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(match self.deadline {
			Some(current) if current <= deadline => current,
			_ => deadline,
		});

		self
	}

	/// Tightens the deadline to `timeout` from now.
	pub fn with_timeout(self, timeout: StdDuration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Uses the provided token as the ambient cancellation signal.
	pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
		self.cancel = cancel;

		self
	}

	/// Deadline imposed by the caller, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Token that fires when the caller gives up.
	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Cancels the context and every scope derived from it.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns `true` once the caller cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Derives a scope bounded by both the ambient deadline and `timeout`.
	pub fn bounded(&self, timeout: StdDuration) -> BoundedScope {
		let now = Instant::now();
		let deadline = effective_deadline(self.deadline, now, timeout);

		BoundedScope {
			cancel: self.cancel.child_token(),
			deadline,
			budget: deadline.saturating_duration_since(now),
		}
	}
}

/// Deadline-bounded child of a [`Context`] owned by one exchange.
#[derive(Debug)]
pub struct BoundedScope {
	cancel: CancellationToken,
	deadline: Instant,
	budget: StdDuration,
}
impl BoundedScope {
	/// Instant at which the scope elapses.
	pub fn deadline(&self) -> Instant {
		self.deadline
	}

	/// Time the scope granted when it was created.
	pub fn budget(&self) -> StdDuration {
		self.budget
	}

	/// Returns `true` if the deadline already passed.
	pub fn is_elapsed(&self) -> bool {
		Instant::now() >= self.deadline
	}

	/// Child token handed to the exchange; cancelled with the scope or its parent.
	pub fn token(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Cancels the scope without touching the parent context.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns `true` once the scope or its parent was cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}
}
