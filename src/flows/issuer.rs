//! Client-credentials exchange against the token endpoint.
//!
//! The issuer always calls the token endpoint; deciding whether a cached token can be reused is
//! the [`AuthGuard`](crate::flows::AuthGuard)'s job. A successful exchange is written to the
//! token store with the server-declared `expires_in` as TTL. Any failure is wrapped in
//! [`Error::Authentication`] and leaves the store untouched.

// crates.io
use http::{HeaderMap, header::AUTHORIZATION};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenResponse},
	config::{ClientConfig, ENDPOINT_TOKEN},
	flows::common,
	http::{HttpRequest, HttpTransport, insert_header},
	obs::{OperationKind, OperationSpan},
	retry::{RetryPolicy, RetryingTransport},
	store::TokenStore,
};

/// Validity period requested from the token endpoint (7 days).
///
/// This is only a hint: the cache TTL always comes from the response's `expires_in`.
pub const VALIDITY_PERIOD_SECS: u64 = 604_800;

/// Performs the `client_credentials` grant and caches the resulting token.
pub struct TokenIssuer<'a, C>
where
	C: ?Sized + HttpTransport,
{
	config: &'a ClientConfig,
	transport: &'a RetryingTransport<C>,
	store: &'a TokenStore,
	retry: RetryPolicy,
	additional_data: &'a BTreeMap<String, String>,
}
impl<'a, C> TokenIssuer<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates an issuer over borrowed client state.
	pub fn new(
		config: &'a ClientConfig,
		transport: &'a RetryingTransport<C>,
		store: &'a TokenStore,
		retry: RetryPolicy,
		additional_data: &'a BTreeMap<String, String>,
	) -> Self {
		Self { config, transport, store, retry, additional_data }
	}

	/// Exchanges the consumer credentials for a bearer token and caches it.
	pub async fn issue(&self) -> Result<AccessToken> {
		const KIND: OperationKind = OperationKind::IssueToken;

		let span = OperationSpan::start(KIND, "issue");
		let result = span
			.instrument(async move {
				let token = self.exchange().await.map_err(Error::authentication)?;

				self.store.put(&token, token.expires_in).await?;

				Ok(token)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Builds the token request without sending it.
	pub fn token_request(&self) -> Result<HttpRequest> {
		let url = common::with_query(
			self.config.endpoint(ENDPOINT_TOKEN),
			&BTreeMap::new(),
			self.additional_data,
		);
		let mut headers = HeaderMap::new();

		insert_header(
			&mut headers,
			AUTHORIZATION,
			"authorization",
			&self.config.credentials.basic_authorization(),
		)?;

		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "client_credentials")
			.append_pair("validity_period", &VALIDITY_PERIOD_SECS.to_string())
			.finish();

		Ok(HttpRequest::post(url).with_headers(headers).with_form_body(body))
	}

	async fn exchange(&self) -> Result<AccessToken> {
		let request = self.token_request()?;
		let response = self.transport.send(self.retry, OperationKind::IssueToken, request).await?;
		let payload: TokenResponse = common::decode_json(&response)?;

		payload.into_access_token()
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use http::header::CONTENT_TYPE;
	// self
	use super::*;
	use crate::{
		auth::Credentials,
		http::{CONTENT_TYPE_FORM, ReqwestTransport},
		store::MemoryCache,
	};

	#[test]
	fn token_request_matches_wire_format() {
		let config = ClientConfig::builder(Credentials::new("key", "secret")).build();
		let transport = <RetryingTransport<ReqwestTransport>>::new(ReqwestTransport::default());
		let store = TokenStore::new(Arc::new(MemoryCache::default()));
		let additional_data = BTreeMap::new();
		let issuer =
			TokenIssuer::new(&config, &transport, &store, RetryPolicy::default(), &additional_data);
		let request = issuer.token_request().expect("Token request should build.");

		assert_eq!(request.url.as_str(), "https://api.insee.fr/token");
		assert_eq!(
			request.headers.get(AUTHORIZATION).map(|v| v.as_bytes()),
			Some(b"Basic a2V5OnNlY3JldA==".as_slice()),
		);
		assert_eq!(
			request.headers.get(CONTENT_TYPE).map(|v| v.as_bytes()),
			Some(CONTENT_TYPE_FORM.as_bytes()),
		);
		assert_eq!(request.body, b"grant_type=client_credentials&validity_period=604800");
	}
}
