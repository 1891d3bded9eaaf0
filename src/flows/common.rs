//! Shared helpers for flow implementations (identifier normalization, query strings, decoding).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::DecodeError, http::HttpResponse};

/// Opaque record returned by lookups; its schema is owned by the remote API.
pub type Record = serde_json::Value;

/// Removes every whitespace character from an identifier.
pub fn normalize_identifier(raw: &str) -> String {
	raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Merges per-call parameters with instance defaults.
///
/// Defaults are applied last, so they win on key collisions.
pub fn merge_parameters(
	call: &BTreeMap<String, String>,
	defaults: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
	let mut merged = call.clone();

	merged.extend(defaults.iter().map(|(k, v)| (k.clone(), v.clone())));

	merged
}

/// Appends the merged parameters to `url` as a form-encoded query string.
///
/// Nothing is appended, not even `?`, when both maps are empty.
pub fn with_query(
	mut url: Url,
	call: &BTreeMap<String, String>,
	defaults: &BTreeMap<String, String>,
) -> Url {
	let merged = merge_parameters(call, defaults);

	if !merged.is_empty() {
		url.query_pairs_mut().extend_pairs(merged.iter());
	}

	url
}

/// Decodes a JSON body, reporting the failing path on error.
pub fn decode_json<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| DecodeError::Json { source, status: response.status.as_u16() }.into())
}
