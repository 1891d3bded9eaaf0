//! Client configuration: credentials, API version, and endpoint formatting.

// std
use std::env;
// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

/// Production API host.
pub const DEFAULT_API_URL: &str = "https://api.insee.fr";
/// Token endpoint path.
pub const ENDPOINT_TOKEN: &str = "/token";
/// SIRENE resource root.
pub const ENDPOINT_SIRENE: &str = "/entreprises/sirene";

/// Environment variable holding the consumer key.
pub const ENV_CONSUMER_KEY: &str = "INSEE_CONSUMER_KEY";
/// Environment variable holding the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "INSEE_CONSUMER_SECRET";
/// Environment variable holding the optional SIRENE API version.
pub const ENV_API_VERSION: &str = "INSEE_SIRENE_API_VERSION";
/// Environment variable overriding the API host.
pub const ENV_API_URL: &str = "INSEE_API_URL";

/// Immutable configuration consumed by [`SireneClient`](crate::flows::SireneClient).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
	/// Consumer key/secret pair.
	#[serde(flatten)]
	pub credentials: Credentials,
	/// SIRENE API version such as `3` or `v3`; `None` or empty omits the version segment.
	#[serde(default, rename = "sirene_api_version")]
	pub api_version: Option<String>,
	/// Scheme + host the endpoints are resolved against.
	#[serde(default = "default_base_url")]
	pub base_url: Url,
}
impl ClientConfig {
	/// Returns a builder seeded with the provided credentials.
	pub fn builder(credentials: Credentials) -> ClientConfigBuilder {
		ClientConfigBuilder::new(credentials)
	}

	/// Loads the configuration from `INSEE_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let required = |name| lookup(name).ok_or(ConfigError::MissingVariable { name });
		let credentials =
			Credentials::new(required(ENV_CONSUMER_KEY)?, required(ENV_CONSUMER_SECRET)?);
		let mut builder = Self::builder(credentials);

		if let Some(version) = lookup(ENV_API_VERSION) {
			builder = builder.api_version(version);
		}
		if let Some(raw) = lookup(ENV_API_URL) {
			let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

			builder = builder.base_url(url);
		}

		Ok(builder.build())
	}

	/// Formats the optional `/V<n>` segment.
	///
	/// Leading `v`/`V` characters are stripped from the configured value so `"3"`, `"v3"`
	/// and `"V3"` all yield `/V3`.
	pub fn version_segment(&self) -> Option<String> {
		let raw = self.api_version.as_deref()?.trim();
		let number = raw.trim_start_matches(['v', 'V']);

		if number.is_empty() { None } else { Some(format!("/V{number}")) }
	}

	/// Returns `/entreprises/sirene` plus the optional version segment.
	pub fn sirene_path(&self) -> String {
		match self.version_segment() {
			Some(segment) => format!("{ENDPOINT_SIRENE}{segment}"),
			None => ENDPOINT_SIRENE.to_owned(),
		}
	}

	/// Appends an endpoint path to the base URL, keeping any path prefix the base carries.
	pub fn endpoint(&self, path: &str) -> Url {
		let mut url = self.base_url.clone();
		let joined = format!("{}{path}", url.path().trim_end_matches('/'));

		url.set_path(&joined);

		url
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	credentials: Credentials,
	api_version: Option<String>,
	base_url: Url,
}
impl ClientConfigBuilder {
	fn new(credentials: Credentials) -> Self {
		Self { credentials, api_version: None, base_url: default_base_url() }
	}

	/// Sets the SIRENE API version.
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = Some(version.into());

		self
	}

	/// Overrides the API host.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Consumes the builder and produces a [`ClientConfig`].
	pub fn build(self) -> ClientConfig {
		ClientConfig {
			credentials: self.credentials,
			api_version: self.api_version,
			base_url: self.base_url,
		}
	}
}

fn default_base_url() -> Url {
	Url::parse(DEFAULT_API_URL).expect("Default API URL is a valid absolute URL.")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(version: Option<&str>) -> ClientConfig {
		let mut builder = ClientConfig::builder(Credentials::new("key", "secret"));

		if let Some(version) = version {
			builder = builder.api_version(version);
		}

		builder.build()
	}

	#[test]
	fn version_segment_strips_leading_v() {
		assert_eq!(config(Some("v3")).version_segment().as_deref(), Some("/V3"));
		assert_eq!(config(Some("V3")).version_segment().as_deref(), Some("/V3"));
		assert_eq!(config(Some("3.11")).version_segment().as_deref(), Some("/V3.11"));
		assert_eq!(config(Some("")).version_segment(), None);
		assert_eq!(config(None).version_segment(), None);
	}

	#[test]
	fn sirene_path_includes_optional_version() {
		assert_eq!(config(None).sirene_path(), "/entreprises/sirene");
		assert_eq!(config(Some("v3")).sirene_path(), "/entreprises/sirene/V3");
	}

	#[test]
	fn endpoint_keeps_base_path_prefix() {
		assert_eq!(config(None).endpoint(ENDPOINT_TOKEN).as_str(), "https://api.insee.fr/token");

		let proxied = ClientConfig::builder(Credentials::new("key", "secret"))
			.base_url(Url::parse("https://proxy.local/insee/").expect("Fixture URL should parse."))
			.build();

		assert_eq!(proxied.endpoint(ENDPOINT_TOKEN).as_str(), "https://proxy.local/insee/token");
	}

	#[test]
	fn lookup_requires_credentials() {
		let err = ClientConfig::from_lookup(|name| {
			(name == ENV_CONSUMER_KEY).then(|| "key".to_owned())
		})
		.expect_err("A missing secret should be reported.");

		assert!(matches!(err, ConfigError::MissingVariable { name: ENV_CONSUMER_SECRET }));
	}

	#[test]
	fn lookup_reads_optional_settings() {
		let config = ClientConfig::from_lookup(|name| match name {
			ENV_CONSUMER_KEY => Some("key".into()),
			ENV_CONSUMER_SECRET => Some("secret".into()),
			ENV_API_VERSION => Some("v3".into()),
			ENV_API_URL => Some("http://127.0.0.1:8080".into()),
			_ => None,
		})
		.expect("Complete variable sets should load.");

		assert_eq!(config.credentials.consumer_secret.expose(), "secret");
		assert_eq!(config.sirene_path(), "/entreprises/sirene/V3");
		assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/");
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: ClientConfig =
			serde_json::from_str(r#"{"consumer_key":"key","consumer_secret":"secret"}"#)
				.expect("Minimal configuration should deserialize.");

		assert_eq!(config.api_version, None);
		assert_eq!(config.base_url.as_str(), "https://api.insee.fr/");
	}
}
