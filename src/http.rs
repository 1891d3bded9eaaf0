//! Transport primitives for SIRENE API calls.
//!
//! [`HttpTransport`] performs exactly one attempt and is the crate's only dependency on an
//! HTTP stack. Retries, status classification and decoding live above it in
//! [`retry`](crate::retry) and [`flows`](crate::flows), so custom transports only need to move
//! bytes and classify connection failures.

// crates.io
use http::{HeaderMap, HeaderValue, Method, StatusCode, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// `Content-Type` sent with lookups.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
/// `Content-Type` sent with token requests.
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing a single request attempt.
///
/// Implementations must report failures to establish a connection as
/// [`TransportError::Connect`] and timeouts before any response as [`TransportError::Timeout`];
/// those are the only transport failures the retry layer retries.
/// Any response that arrives, whatever its status, is returned as `Ok`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` once.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Owned request description that can be replayed across retries.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Request body.
	pub body: Vec<u8>,
}
impl HttpRequest {
	/// Creates a bodiless request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: Vec::new() }
	}

	/// Creates a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Creates a `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Replaces the headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}

	/// Sets a form-encoded body along with the matching content type.
	pub fn with_form_body(mut self, body: String) -> Self {
		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
		self.body = body.into_bytes();

		self
	}
}

/// Fully buffered response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Creates a response with no headers.
	pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns the first characters of the body, lossily decoded, for diagnostics.
	pub fn body_preview(&self) -> String {
		String::from_utf8_lossy(&self.body).chars().take(Self::BODY_PREVIEW_LIMIT).collect()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with an overall request timeout. [`std::time::Duration::ZERO`] disables
	/// the timeout.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if !timeout.is_zero() {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}

	async fn execute_now(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let response = self
			.0
			.request(request.method, request.url)
			.headers(request.headers)
			.body(request.body)
			.send()
			.await?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let body = response.bytes().await.map_err(TransportError::network)?.to_vec();

		Ok(HttpResponse { status, headers, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(self.execute_now(request))
	}
}

/// Inserts a header, reporting values HTTP cannot carry.
pub(crate) fn insert_header(
	headers: &mut HeaderMap,
	name: http::header::HeaderName,
	label: &'static str,
	value: &str,
) -> Result<(), ConfigError> {
	let value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader { name: label })?;

	headers.insert(name, value);

	Ok(())
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::header::AUTHORIZATION;
	// self
	use super::*;

	#[test]
	fn form_body_sets_content_type() {
		let url = Url::parse("https://example.com/token").expect("Fixture URL should parse.");
		let request = HttpRequest::post(url).with_form_body("grant_type=client_credentials".into());

		assert_eq!(request.method, Method::POST);
		assert_eq!(
			request.headers.get(CONTENT_TYPE).map(|v| v.as_bytes()),
			Some(CONTENT_TYPE_FORM.as_bytes()),
		);
		assert_eq!(request.body, b"grant_type=client_credentials");
	}

	#[test]
	fn body_preview_is_truncated() {
		let response = HttpResponse::new(StatusCode::BAD_GATEWAY, "x".repeat(1_000));

		assert_eq!(response.body_preview().len(), 256);
		assert!(!response.is_success());
	}

	#[test]
	fn insert_header_rejects_control_characters() {
		let mut headers = HeaderMap::new();
		let err = insert_header(&mut headers, AUTHORIZATION, "authorization", "Bearer a\nb")
			.expect_err("Newlines should be rejected.");

		assert!(matches!(err, ConfigError::InvalidHeader { name: "authorization" }));
		assert!(headers.is_empty());
	}
}
