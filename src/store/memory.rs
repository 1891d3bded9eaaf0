//! Thread-safe in-memory [`CacheBackend`] implementation for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	store::{CacheBackend, Clock, StoreError, StoreFuture, SystemClock},
};

#[derive(Clone, Debug)]
struct Entry {
	value: String,
	expires_at: OffsetDateTime,
}

type CacheMap = Arc<RwLock<HashMap<String, Entry>>>;

/// In-process TTL cache. Clones share the same entries.
#[derive(Clone)]
pub struct MemoryCache {
	entries: CacheMap,
	clock: Arc<dyn Clock>,
}
impl MemoryCache {
	/// Creates a cache that evaluates expiry against `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { entries: Default::default(), clock }
	}

	/// Number of entries currently held, including expired ones not yet pruned.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns `true` when no entries are held.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	fn get_now(&self, key: &str) -> Option<String> {
		let now = self.clock.now();
		let live = self.entries.read().get(key).filter(|entry| now < entry.expires_at).cloned();

		if live.is_none() {
			let mut guard = self.entries.write();

			if guard.get(key).is_some_and(|entry| now >= entry.expires_at) {
				guard.remove(key);
			}
		}

		live.map(|entry| entry.value)
	}

	fn put_now(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
		let expires_at = super::expiry(self.clock.now(), ttl)?;

		self.entries.write().insert(key.to_owned(), Entry { value, expires_at });

		Ok(())
	}
}
impl Default for MemoryCache {
	fn default() -> Self {
		Self::with_clock(Arc::new(SystemClock))
	}
}
impl Debug for MemoryCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryCache").field("entries", &self.len()).finish()
	}
}
impl CacheBackend for MemoryCache {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move { Ok(self.get_now(key)) })
	}

	fn put<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.put_now(key, value, ttl) })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::store::ManualClock;

	fn cache_at(start: OffsetDateTime) -> (MemoryCache, ManualClock) {
		let clock = ManualClock::new(start);

		(MemoryCache::with_clock(Arc::new(clock.clone())), clock)
	}

	#[tokio::test]
	async fn entry_expires_exactly_at_ttl() {
		let (cache, clock) = cache_at(macros::datetime!(2025-06-01 08:00 UTC));

		cache
			.put("key", "value".into(), Duration::seconds(604_800))
			.await
			.expect("Put should succeed.");
		clock.advance(Duration::seconds(604_799));

		assert_eq!(cache.get("key").await.expect("Get should succeed."), Some("value".into()));

		clock.advance(Duration::seconds(1));

		assert_eq!(cache.get("key").await.expect("Get should succeed."), None);
		assert!(cache.is_empty());
	}

	#[tokio::test]
	async fn rejects_non_positive_ttl() {
		let cache = MemoryCache::default();
		let err = cache
			.put("key", "value".into(), Duration::ZERO)
			.await
			.expect_err("Zero TTL should be rejected.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert!(cache.is_empty());
	}

	#[tokio::test]
	async fn out_of_range_ttl_is_an_error() {
		let cache = MemoryCache::default();
		let err = cache
			.put("key", "value".into(), Duration::seconds(9_000_000_000_000_000))
			.await
			.expect_err("TTLs past the representable calendar should be rejected.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert!(cache.is_empty());
	}

	#[tokio::test]
	async fn clones_share_entries() {
		let cache = MemoryCache::default();
		let other = cache.clone();

		cache.put("key", "shared".into(), Duration::minutes(1)).await.expect("Put should succeed.");

		assert_eq!(other.get("key").await.expect("Get should succeed."), Some("shared".into()));
	}
}
