//! Cache contracts and built-in backends holding the shared bearer token.

pub mod clock;
pub mod file;
pub mod memory;

pub use clock::*;
pub use file::FileCache;
pub use memory::MemoryCache;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
};

/// Fixed cache key under which the bearer token lives.
pub const TOKEN_CACHE_KEY: &str = "inesee-sirene-token";

/// Boxed future returned by [`CacheBackend`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Generic key-value cache with per-entry time-to-live.
///
/// Backends may be shared by several clients (or processes); a `put` must replace the previous
/// value as a whole so concurrent readers never observe a partial write.
pub trait CacheBackend
where
	Self: Send + Sync,
{
	/// Returns the live value stored under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Stores `value` under `key`, replacing any previous entry, for `ttl`.
	fn put<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CacheBackend`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Computes `now + ttl`, rejecting non-positive TTLs and instants past the supported range.
pub(crate) fn expiry(now: OffsetDateTime, ttl: Duration) -> Result<OffsetDateTime, StoreError> {
	if ttl <= Duration::ZERO {
		return Err(StoreError::Backend { message: format!("TTL must be positive, got {ttl}") });
	}

	now.checked_add(ttl).ok_or_else(|| StoreError::Backend {
		message: format!("TTL {ttl} exceeds the supported time range"),
	})
}

/// Fixed-key view over a [`CacheBackend`] that reads and writes the bearer token.
#[derive(Clone)]
pub struct TokenStore {
	backend: Arc<dyn CacheBackend>,
	key: &'static str,
}
impl TokenStore {
	/// Wraps a backend using [`TOKEN_CACHE_KEY`].
	pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
		Self { backend, key: TOKEN_CACHE_KEY }
	}

	/// Returns the cached bearer token, if the backend still holds one.
	pub async fn get(&self) -> Result<Option<TokenSecret>, StoreError> {
		Ok(self.backend.get(self.key).await?.map(TokenSecret::new))
	}

	/// Caches `token` for `ttl`, overwriting the previous token.
	pub async fn put(&self, token: &AccessToken, ttl: Duration) -> Result<(), StoreError> {
		self.backend.put(self.key, token.secret.expose().to_owned(), ttl).await
	}

	/// Returns the key this store reads and writes.
	pub fn key(&self) -> &str {
		self.key
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore").field("key", &self.key).finish()
	}
}
