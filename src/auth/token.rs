//! Bearer token values and the token endpoint payload.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the inner value.
	pub fn into_inner(self) -> String {
		self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer token issued by the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Token value sent in `Authorization: Bearer`.
	pub secret: TokenSecret,
	/// Lifetime declared by the server; also the cache TTL.
	pub expires_in: Duration,
}
impl AccessToken {
	/// Creates a token with the provided lifetime.
	pub fn new(secret: impl Into<String>, expires_in: Duration) -> Self {
		Self { secret: TokenSecret::new(secret), expires_in }
	}

	/// Renders the `Authorization: Bearer` value.
	pub fn bearer_authorization(&self) -> String {
		bearer_authorization(&self.secret)
	}
}

/// Renders `Bearer <token>` for an arbitrary secret.
pub fn bearer_authorization(secret: &TokenSecret) -> String {
	format!("Bearer {}", secret.expose())
}

/// JSON body returned by `POST /token`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Issued bearer token.
	pub access_token: String,
	/// Lifetime in seconds.
	pub expires_in: i64,
}
impl TokenResponse {
	/// Validates the payload and converts it into an [`AccessToken`].
	pub fn into_access_token(self) -> Result<AccessToken> {
		if self.access_token.is_empty() {
			return Err(Error::InvalidTokenResponse { reason: "access_token is empty".into() });
		}
		if self.expires_in <= 0 {
			return Err(Error::InvalidTokenResponse {
				reason: format!("expires_in must be positive, got {}", self.expires_in),
			});
		}

		Ok(AccessToken::new(self.access_token, Duration::seconds(self.expires_in)))
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn token_response_uses_server_lifetime() {
		let response: TokenResponse =
			serde_json::from_str(r#"{"access_token":"abc","token_type":"Bearer","expires_in":604800}"#)
				.expect("Token response fixture should deserialize.");
		let token = response.into_access_token().expect("Token response should be accepted.");

		assert_eq!(token.secret.expose(), "abc");
		assert_eq!(token.expires_in, Duration::days(7));
		assert_eq!(token.bearer_authorization(), "Bearer abc");
	}

	#[test]
	fn token_response_rejects_non_positive_lifetime() {
		let response = TokenResponse { access_token: "abc".into(), expires_in: 0 };
		let err = response.into_access_token().expect_err("Zero lifetimes should be rejected.");

		assert!(matches!(err, Error::InvalidTokenResponse { .. }));
	}
}
