// crates.io
use httpmock::prelude::*;
// self
use sirene_client::{
	_preludet::*,
	flows::IdentifierKind,
	store::{CacheBackend, TOKEN_CACHE_KEY},
};

const TOKEN_BODY: &str = r#"{"access_token":"issued-token","scope":"am_application_scope default","token_type":"Bearer","expires_in":604800}"#;
const BASIC_AUTH: &str = "Basic Y29uc3VtZXIta2V5OmNvbnN1bWVyLXNlY3JldA==";

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("authorization", BASIC_AUTH)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("grant_type=client_credentials&validity_period=604800");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await
}

#[tokio::test]
async fn siren_on_cold_cache_issues_token_then_fetches() {
	let server = MockServer::start_async().await;
	let (client, cache) = build_reqwest_test_client(&server.base_url(), None);
	let token_mock = mock_token(&server).await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/entreprises/sirene/siren/123456789")
				.header("authorization", "Bearer issued-token")
				.header("content-type", "application/json; charset=utf-8");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"uniteLegale":{"siren":"123456789"}}"#);
		})
		.await;
	let record = client.siren("123 456 789").await.expect("Cold-cache lookup should succeed.");

	assert_eq!(record["uniteLegale"]["siren"], "123456789");

	token_mock.assert_calls_async(1).await;
	lookup_mock.assert_calls_async(1).await;

	let cached = cache
		.get(TOKEN_CACHE_KEY)
		.await
		.expect("Cache lookup should succeed.")
		.expect("Issued token should be cached under the fixed key.");

	assert_eq!(cached, "issued-token");
}

#[tokio::test]
async fn warm_cache_skips_token_endpoint() {
	let server = MockServer::start_async().await;
	let (client, cache) = build_reqwest_test_client(&server.base_url(), None);
	let token_mock = mock_token(&server).await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/entreprises/sirene/siret/12345678900012")
				.header("authorization", "Bearer cached-token");
			then.status(200).header("content-type", "application/json").body(r#"{"etablissement":{}}"#);
		})
		.await;

	cache
		.put(TOKEN_CACHE_KEY, "cached-token".into(), Duration::hours(1))
		.await
		.expect("Seeding the cache should succeed.");

	for _ in 0..2 {
		client.siret("123 456 789 00012").await.expect("Warm-cache lookup should succeed.");
	}

	token_mock.assert_calls_async(0).await;
	lookup_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn cached_token_is_reused_across_lookups() {
	let server = MockServer::start_async().await;
	let (client, _cache) = build_reqwest_test_client(&server.base_url(), None);
	let token_mock = mock_token(&server).await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/entreprises/sirene/siren/552100554");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;

	client.siren("552100554").await.expect("First lookup should succeed.");
	client.siren("552 100 554").await.expect("Second lookup should succeed.");

	token_mock.assert_calls_async(1).await;
	lookup_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn versioned_api_and_additional_data_shape_the_request() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let (client, _cache) = build_reqwest_test_client(&server.base_url(), Some("v3"));
	let client = client.with_additional_data("date", "2024-01-01");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").query_param("date", "2024-01-01");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/entreprises/sirene/V3/siret/12345678900012")
				.query_param("date", "2024-01-01");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"etablissement":{"siret":"12345678900012"}}"#);
		})
		.await;
	let record = client.lookup(IdentifierKind::Siret, "12345678900012").await?;

	assert_eq!(record["etablissement"]["siret"], "12345678900012");

	token_mock.assert_async().await;
	lookup_mock.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn typed_lookup_decodes_into_caller_type() {
	#[derive(Debug, Deserialize)]
	struct UniteLegale {
		siren: String,
	}
	#[derive(Debug, Deserialize)]
	#[serde(rename_all = "camelCase")]
	struct SirenResponse {
		unite_legale: UniteLegale,
	}

	let server = MockServer::start_async().await;
	let (client, _cache) = build_reqwest_test_client(&server.base_url(), None);
	let _token_mock = mock_token(&server).await;
	let _lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/entreprises/sirene/siren/123456789");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"uniteLegale":{"siren":"123456789"}}"#);
		})
		.await;
	let response: SirenResponse =
		client.siren_as("123456789").await.expect("Typed lookup should decode.");

	assert_eq!(response.unite_legale.siren, "123456789");
}

#[tokio::test]
async fn malformed_body_surfaces_decode_error() {
	let server = MockServer::start_async().await;
	let (client, _cache) = build_reqwest_test_client(&server.base_url(), None);
	let _token_mock = mock_token(&server).await;
	let _lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/entreprises/sirene/siren/123456789");
			then.status(200).header("content-type", "text/html").body("<html>maintenance</html>");
		})
		.await;
	let err = client.siren("123456789").await.expect_err("HTML bodies should not decode.");

	assert!(matches!(err, Error::Decode(_)));
}
