//! SIRENE client and the flows it orchestrates: token issuance, authentication, and lookups.

pub mod common;
pub mod guard;
pub mod issuer;

mod lookup;

pub use common::*;
pub use guard::*;
pub use issuer::*;
pub use lookup::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	http::HttpTransport,
	retry::{RetryPolicy, RetryingTransport},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSireneClient = SireneClient<ReqwestTransport>;

/// Client for the INSEE SIRENE API.
///
/// The client owns the transport, the token store view, and the configuration, so each flow
/// only borrows what it needs for a single call. `additional_data` and `retry` are public so
/// callers can adjust them between calls; every request picks up their current values.
pub struct SireneClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Credentials, API version, and host.
	pub config: ClientConfig,
	/// Fixed-key view over the shared token cache.
	pub store: TokenStore,
	/// Transport wrapped with retry handling.
	pub transport: RetryingTransport<C>,
	/// Query parameters appended to every request.
	pub additional_data: BTreeMap<String, String>,
	/// Retry budget and delay applied to every request.
	pub retry: RetryPolicy,
}
impl<C> SireneClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: TokenStore,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self {
			config,
			store,
			transport: RetryingTransport::new(transport),
			additional_data: BTreeMap::new(),
			retry: RetryPolicy::default(),
		}
	}

	/// Sets a query parameter appended to every request.
	pub fn with_additional_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.additional_data.insert(key.into(), value.into());

		self
	}

	/// Replaces the retry policy.
	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;

		self
	}

	/// Builds the token issuer bound to this client's state.
	pub fn issuer(&self) -> TokenIssuer<'_, C> {
		TokenIssuer::new(&self.config, &self.transport, &self.store, self.retry, &self.additional_data)
	}

	/// Builds the authentication guard bound to this client's state.
	pub fn guard(&self) -> AuthGuard<'_, C> {
		AuthGuard::new(&self.store, self.issuer())
	}

	/// Requests a new bearer token and caches it, regardless of the cache state.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		Ok(self.issuer().issue().await?.secret)
	}
}
#[cfg(feature = "reqwest")]
impl SireneClient<ReqwestTransport> {
	/// Creates a client with its own reqwest transport.
	///
	/// `timeout` bounds every HTTP request; [`std::time::Duration::ZERO`] disables it.
	pub fn new(
		config: ClientConfig,
		store: TokenStore,
		timeout: std::time::Duration,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_transport(config, store, ReqwestTransport::with_timeout(timeout)?))
	}
}
impl<C> Debug for SireneClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SireneClient")
			.field("config", &self.config)
			.field("store", &self.store)
			.field("additional_data", &self.additional_data)
			.field("retry", &self.retry)
			.finish()
	}
}
