// self
use crate::{
	_prelude::*,
	obs::{self, OperationKind, OperationOutcome},
};

/// Future returned by [`OperationSpan::instrument`]; instrumented only with the `tracing`
/// feature.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; instrumented only with the `tracing`
/// feature.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Lifecycle of one client operation: opens the `sirene_client.op` span, counts the attempt,
/// and records the final outcome and HTTP status.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	kind: OperationKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Starts an operation and counts the attempt.
	pub fn start(kind: OperationKind, stage: &'static str) -> Self {
		obs::record_outcome(kind, OperationOutcome::Attempt);

		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"sirene_client.op",
				op = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Operation this span tracks.
	pub fn kind(&self) -> OperationKind {
		self.kind
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Records how the operation ended and returns the outcome label.
	///
	/// Failures carrying an HTTP status (directly or through an authentication failure) set
	/// the span's `status` field.
	pub fn finish<T>(&self, result: &Result<T>) -> OperationOutcome {
		let outcome =
			if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure };

		obs::record_outcome(self.kind, outcome);

		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());

			if let Err(e) = result {
				if let Some(status) = e.status() {
					self.span.record("status", status);
				}

				tracing::debug!(parent: &self.span, error = %e, "SIRENE operation failed.");
			}
		}

		outcome
	}
}

/// Emits a debug event describing a token cache lookup.
pub fn record_token_cache(hit: bool) {
	#[cfg(feature = "tracing")]
	{
		if hit {
			tracing::debug!("Bearer token served from cache.");
		} else {
			tracing::debug!("Bearer token missing from cache, requesting a new one.");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = hit;
	}
}
