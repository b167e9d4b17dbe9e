//! Optional observability helpers for backend operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_accesstoken.operation` with the
//!   `operation`, `stage` (call site) and `client` (per-client handlers) fields, plus a `warn`
//!   event whenever an exchange is abandoned.
//! - Enable `metrics` to increment the `oauth2_accesstoken_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and the
//!   `oauth2_accesstoken_exchange_abandoned_total` counter labeled by `cause`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Backend operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Validated write of a client configuration.
	WriteClient,
	/// Read of a stored client configuration.
	ReadClient,
	/// Removal of a client configuration.
	DeleteClient,
	/// Enumeration of stored client names.
	ListClients,
	/// Issuance of a fresh access token.
	ReadAccessToken,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::WriteClient => "write_client",
			OperationKind::ReadClient => "read_client",
			OperationKind::DeleteClient => "delete_client",
			OperationKind::ListClients => "list_clients",
			OperationKind::ReadAccessToken => "read_access_token",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a handler.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why an in-flight exchange was abandoned by the issuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbandonCause {
	/// The bounded scope elapsed first.
	Deadline,
	/// The caller cancelled first.
	Cancelled,
}
impl AbandonCause {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AbandonCause::Deadline => "deadline",
			AbandonCause::Cancelled => "cancelled",
		}
	}
}
impl Display for AbandonCause {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records that an exchange lost its race and was aborted.
pub fn record_exchange_abandoned(cause: AbandonCause) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(cause = cause.as_str(), "Abandoned an in-flight token exchange.");

	record_exchange_abandoned_metric(cause);
}
