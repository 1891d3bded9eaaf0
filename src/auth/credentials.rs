//! Consumer key/secret pair exchanged for bearer tokens.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Consumer key/secret pair registered with the INSEE API portal.
///
/// The secret is wrapped in [`TokenSecret`] so formatting the credentials never leaks it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
	/// Public consumer key.
	pub consumer_key: String,
	/// Consumer secret; callers must avoid logging it.
	pub consumer_secret: TokenSecret,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: TokenSecret::new(consumer_secret),
		}
	}

	/// Renders the `Authorization: Basic` value for the token endpoint.
	pub fn basic_authorization(&self) -> String {
		let raw = format!("{}:{}", self.consumer_key, self.consumer_secret.expose());

		format!("Basic {}", STANDARD.encode(raw))
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &"<redacted>")
			.finish()
	}
}
