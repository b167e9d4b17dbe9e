// self
use crate::obs::{AbandonCause, OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_accesstoken_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

pub(crate) fn record_exchange_abandoned_metric(cause: AbandonCause) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_accesstoken_exchange_abandoned_total", "cause" => cause.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = cause;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_callable_without_an_installed_recorder() {
		record_operation_outcome(OperationKind::ReadAccessToken, OperationOutcome::Failure);
		record_exchange_abandoned_metric(AbandonCause::Deadline);
	}
}
