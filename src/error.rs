//! Client-level error types shared across flows, transports, and stores.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Remote API answered with a non-2xx status.
	#[error("SIRENE API responded with HTTP {status}.")]
	HttpStatus {
		/// HTTP status code of the last attempt.
		status: u16,
		/// Leading part of the response body, for diagnostics.
		body_preview: String,
	},
	/// Token endpoint answered with a payload that cannot be cached.
	#[error("Token endpoint returned an unusable token: {reason}.")]
	InvalidTokenResponse {
		/// Why the payload was rejected.
		reason: String,
	},
	/// Token issuance failed; the source holds the underlying failure.
	#[error("Unable to obtain an access token.")]
	Authentication {
		/// Failure that prevented issuance.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Wraps a token issuance failure inside [`Error::Authentication`].
	pub fn authentication(source: Error) -> Self {
		Self::Authentication { source: Box::new(source) }
	}

	/// Returns the HTTP status attached to the error, looking through authentication failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::HttpStatus { status, .. } => Some(*status),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			Self::Authentication { source } => source.status(),
			_ => None,
		}
	}

	/// Returns `true` when the error (or its authentication source) is a connection failure.
	pub fn is_connect(&self) -> bool {
		match self {
			Self::Transport(e) => e.is_connect(),
			Self::Authentication { source } => source.is_connect(),
			_ => false,
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed or joined with an endpoint path.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header value contains characters HTTP does not allow.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
	},
	/// Required environment variable is absent or not valid unicode.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// No connection could be established with the remote host.
	#[error("Unable to connect to the SIRENE API.")]
	Connect {
		/// Transport-specific connection error.
		#[source]
		source: BoxError,
	},
	/// Request timed out before any response arrived.
	#[error("Request to the SIRENE API timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Exchange failed after a response started (reset, broken body, body timeout).
	#[error("Network error occurred while calling the SIRENE API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the SIRENE API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a connection-establishment failure.
	pub fn connect(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Connect { source: Box::new(src) }
	}

	/// Wraps a timeout raised before any response arrived.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` for connection-establishment failures.
	pub fn is_connect(&self) -> bool {
		matches!(self, Self::Connect { .. })
	}

	/// Returns `true` for failures that left no response behind: refused connections and
	/// timeouts. These are the transport failures worth another attempt.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Connect { .. } | Self::Timeout { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_connect() {
			Self::connect(e)
		} else if e.is_timeout() {
			Self::timeout(e)
		} else {
			Self::network(e)
		}
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the requested shape.
	#[error("Response body is not valid JSON at `{}`.", .source.path())]
	Json {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the decoded response.
		status: u16,
	},
}
