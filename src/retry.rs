//! Bounded retry with a fixed delay for transient network and server failures.
//!
//! Retried outcomes: failures to establish a connection, timeouts before any response, and
//! responses with a 5xx status. Client errors are surfaced on the first attempt.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{HttpRequest, HttpResponse, HttpTransport},
	obs::{self, OperationKind},
};

/// Retry settings applied to every request a client sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
	/// Retries allowed after the first attempt.
	pub max_retries: u32,
	/// Fixed delay between attempts, in milliseconds.
	pub retry_delay_ms: u64,
}
impl RetryPolicy {
	/// Default number of retries.
	pub const DEFAULT_MAX_RETRIES: u32 = 2;
	/// Default delay between attempts.
	pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

	/// Creates a policy.
	pub const fn new(max_retries: u32, retry_delay_ms: u64) -> Self {
		Self { max_retries, retry_delay_ms }
	}

	/// Policy that never retries.
	pub const fn none() -> Self {
		Self::new(0, 0)
	}

	/// Delay to wait before the next attempt.
	pub fn retry_delay(&self) -> StdDuration {
		StdDuration::from_millis(self.retry_delay_ms)
	}

	/// Applies [`should_retry`] with this policy's budget.
	pub fn should_retry(&self, retries: u32, outcome: AttemptOutcome) -> bool {
		should_retry(retries, self.max_retries, outcome)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_RETRY_DELAY_MS)
	}
}

/// Classified result of a single attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
	/// No connection could be established.
	ConnectionFailure,
	/// The request timed out before a response arrived.
	Timeout,
	/// Any other transport failure (resets, unreadable bodies).
	OtherFailure,
	/// A response arrived with this status code.
	Status(u16),
}
impl AttemptOutcome {
	/// Classifies the result of a transport call.
	pub fn classify(result: &Result<HttpResponse, TransportError>) -> Self {
		match result {
			Ok(response) => Self::Status(response.status.as_u16()),
			Err(e) if e.is_connect() => Self::ConnectionFailure,
			Err(e) if e.is_retryable() => Self::Timeout,
			Err(_) => Self::OtherFailure,
		}
	}

	/// Stable label suitable for span or metric fields.
	pub const fn reason(self) -> &'static str {
		match self {
			Self::ConnectionFailure => "connection",
			Self::Timeout => "timeout",
			Self::OtherFailure => "transport",
			Self::Status(_) => "server_error",
		}
	}
}

/// Decides whether another attempt should follow.
///
/// `retries` is the number of retries already performed, so with `max_retries = 2` a request
/// is attempted at most three times.
pub fn should_retry(retries: u32, max_retries: u32, outcome: AttemptOutcome) -> bool {
	if retries >= max_retries {
		return false;
	}

	match outcome {
		AttemptOutcome::ConnectionFailure | AttemptOutcome::Timeout => true,
		AttemptOutcome::Status(status) => status >= 500,
		AttemptOutcome::OtherFailure => false,
	}
}

/// Wraps an [`HttpTransport`] with a [`RetryPolicy`] and status classification.
pub struct RetryingTransport<C>
where
	C: ?Sized + HttpTransport,
{
	inner: Arc<C>,
}
impl<C> RetryingTransport<C>
where
	C: ?Sized + HttpTransport,
{
	/// Wraps `inner`.
	pub fn new(inner: impl Into<Arc<C>>) -> Self {
		Self { inner: inner.into() }
	}

	/// Returns the wrapped transport.
	pub fn inner(&self) -> &Arc<C> {
		&self.inner
	}

	/// Sends `request`, retrying per `policy`.
	///
	/// Returns the first 2xx response. Once no retry is left, a non-2xx response becomes
	/// [`Error::HttpStatus`] and a transport failure becomes [`Error::Transport`].
	pub async fn send(
		&self,
		policy: RetryPolicy,
		kind: OperationKind,
		request: HttpRequest,
	) -> Result<HttpResponse> {
		let mut retries = 0;

		loop {
			let result = self.inner.execute(request.clone()).await;
			let outcome = AttemptOutcome::classify(&result);

			if !policy.should_retry(retries, outcome) {
				return finish(result);
			}

			retries += 1;

			obs::record_retry(kind, retries, outcome, policy.retry_delay_ms);

			if policy.retry_delay_ms > 0 {
				tokio::time::sleep(policy.retry_delay()).await;
			}
		}
	}
}
impl<C> Clone for RetryingTransport<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}
impl<C> Debug for RetryingTransport<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RetryingTransport(..)")
	}
}

fn finish(result: Result<HttpResponse, TransportError>) -> Result<HttpResponse> {
	let response = result?;

	if response.is_success() {
		Ok(response)
	} else {
		Err(Error::HttpStatus { status: response.status.as_u16(), body_preview: response.body_preview() })
	}
}
