//! INSEE SIRENE API client with client-credentials authentication backed by a shared token cache,
//! bounded retries for transient failures, and SIREN/SIRET lookups in one small crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod retry;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		config::ClientConfig,
		flows::SireneClient,
		http::ReqwestTransport,
		store::{CacheBackend, MemoryCache, TokenStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = SireneClient<ReqwestTransport>;

	/// Consumer key used by test fixtures.
	pub const TEST_CONSUMER_KEY: &str = "consumer-key";
	/// Consumer secret used by test fixtures.
	pub const TEST_CONSUMER_SECRET: &str = "consumer-secret";

	/// Builds a reqwest transport that trusts the mock server's self-signed certificate.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Builds a configuration pointing at `base_url` with the fixture credentials.
	pub fn test_config(base_url: &str, api_version: Option<&str>) -> ClientConfig {
		let mut builder = ClientConfig::builder(Credentials::new(
			TEST_CONSUMER_KEY,
			TEST_CONSUMER_SECRET,
		))
		.base_url(Url::parse(base_url).expect("Mock server URL should parse successfully."));

		if let Some(version) = api_version {
			builder = builder.api_version(version);
		}

		builder.build()
	}

	/// Constructs a [`SireneClient`] backed by an in-memory cache and a reqwest transport
	/// without retry delays.
	pub fn build_reqwest_test_client(
		base_url: &str,
		api_version: Option<&str>,
	) -> (ReqwestTestClient, Arc<MemoryCache>) {
		let cache = Arc::new(MemoryCache::default());
		let backend: Arc<dyn CacheBackend> = cache.clone();
		let mut client: ReqwestTestClient = SireneClient::with_transport(
			test_config(base_url, api_version),
			TokenStore::new(backend),
			test_reqwest_transport(),
		);

		client.retry.retry_delay_ms = 0;

		(client, cache)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
