//! Read-through authentication guard attaching bearer tokens to outgoing requests.

// crates.io
use http::{HeaderMap, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, bearer_authorization},
	flows::TokenIssuer,
	http::{HttpTransport, insert_header},
	obs,
	store::TokenStore,
};

/// Ensures outgoing headers carry a bearer token.
///
/// The guard never judges expiry on its own: it trusts the cache backend's TTL, so a miss is
/// the only signal that a new token is needed. Concurrent misses are not coalesced; each one
/// issues a token and the last write wins.
pub struct AuthGuard<'a, C>
where
	C: ?Sized + HttpTransport,
{
	store: &'a TokenStore,
	issuer: TokenIssuer<'a, C>,
}
impl<'a, C> AuthGuard<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a guard reading `store` and falling back to `issuer`.
	pub fn new(store: &'a TokenStore, issuer: TokenIssuer<'a, C>) -> Self {
		Self { store, issuer }
	}

	/// Returns the cached token, issuing (and caching) a new one on a miss.
	pub async fn current_token(&self) -> Result<TokenSecret> {
		if let Some(secret) = self.store.get().await? {
			obs::record_token_cache(true);

			return Ok(secret);
		}

		obs::record_token_cache(false);

		Ok(self.issuer.issue().await?.secret)
	}

	/// Injects `Authorization: Bearer <token>` into `headers`.
	pub async fn ensure_authenticated(&self, mut headers: HeaderMap) -> Result<HeaderMap> {
		let secret = self.current_token().await?;

		insert_header(&mut headers, AUTHORIZATION, "authorization", &bearer_authorization(&secret))?;

		Ok(headers)
	}
}
