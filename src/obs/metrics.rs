// self
use crate::{
	obs::{OperationKind, OperationOutcome},
	retry::AttemptOutcome,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sirene_client_operation_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a scheduled retry. `retry` is 1 for the first retry.
pub fn record_retry(kind: OperationKind, retry: u32, outcome: AttemptOutcome, delay_ms: u64) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sirene_client_retry_total",
			"op" => kind.as_str(),
			"reason" => outcome.reason()
		)
		.increment(1);
	}

	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			op = kind.as_str(),
			retry,
			reason = outcome.reason(),
			status = ?outcome,
			delay_ms,
			"Transient SIRENE API failure, retrying."
		);
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = (kind, retry, outcome, delay_ms);
	}
	#[cfg(all(feature = "metrics", not(feature = "tracing")))]
	{
		let _ = (retry, delay_ms);
	}
}
