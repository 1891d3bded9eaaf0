//! SIREN/SIRET lookups.

// crates.io
use http::{HeaderMap, HeaderValue, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	flows::{
		SireneClient,
		common::{self, Record},
	},
	http::{CONTENT_TYPE_JSON, HttpRequest, HttpTransport},
	obs::{OperationKind, OperationSpan},
};

/// Identifier families accepted by the SIRENE API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
	/// 9-digit company identifier.
	Siren,
	/// 14-digit establishment identifier.
	Siret,
}
impl IdentifierKind {
	/// Path segment naming the resource.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentifierKind::Siren => "siren",
			IdentifierKind::Siret => "siret",
		}
	}

	/// Operation label used for spans and metrics.
	pub const fn operation(self) -> OperationKind {
		match self {
			IdentifierKind::Siren => OperationKind::SirenLookup,
			IdentifierKind::Siret => OperationKind::SiretLookup,
		}
	}
}
impl Display for IdentifierKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

impl<C> SireneClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the company registered under a SIREN number.
	///
	/// Whitespace is removed from `siren` before the request is sent.
	pub async fn siren(&self, siren: &str) -> Result<Record> {
		self.lookup(IdentifierKind::Siren, siren).await
	}

	/// Fetches the establishment registered under a SIRET number.
	///
	/// Whitespace is removed from `siret` before the request is sent.
	pub async fn siret(&self, siret: &str) -> Result<Record> {
		self.lookup(IdentifierKind::Siret, siret).await
	}

	/// Same as [`SireneClient::siren`], decoding into `T`.
	pub async fn siren_as<T>(&self, siren: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.lookup_as(IdentifierKind::Siren, siren).await
	}

	/// Same as [`SireneClient::siret`], decoding into `T`.
	pub async fn siret_as<T>(&self, siret: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.lookup_as(IdentifierKind::Siret, siret).await
	}

	/// Looks an identifier up and returns the raw JSON record.
	pub async fn lookup(&self, kind: IdentifierKind, identifier: &str) -> Result<Record> {
		self.lookup_as(kind, identifier).await
	}

	/// Looks an identifier up and decodes the body into `T`.
	pub async fn lookup_as<T>(&self, kind: IdentifierKind, identifier: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let op = kind.operation();
		let span = OperationSpan::start(op, "lookup");
		let result = span
			.instrument(async move {
				let identifier = common::normalize_identifier(identifier);
				let mut headers = HeaderMap::new();

				headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

				let headers = self.guard().ensure_authenticated(headers).await?;
				let request =
					HttpRequest::get(self.lookup_url(kind, &identifier)).with_headers(headers);
				let response = self.transport.send(self.retry, op, request).await?;

				common::decode_json(&response)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Builds the lookup URL for an already normalized identifier.
	pub fn lookup_url(&self, kind: IdentifierKind, identifier: &str) -> Url {
		let path = format!("{}/{}/{identifier}", self.config.sirene_path(), kind.as_str());

		common::with_query(self.config.endpoint(&path), &BTreeMap::new(), &self.additional_data)
	}
}
