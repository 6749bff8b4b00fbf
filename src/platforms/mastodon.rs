//! Mastodon platform adapter.
//!
//! Mastodon is federated: every domain runs an independent instance, so there is no global
//! client id to configure. Applications register with each instance once, over its
//! `/api/v1/apps` endpoint, before the host's OAuth2 flow can run against that domain. The
//! module declares the instance-templated descriptor, the account field extractors, the
//! search-narrowing resolver, and that one bootstrap call.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	extract::{ExtractorSet, FieldRule, RecordResolver, Resolution, extract_domain_from_url},
	http::{FormField, RawResponse, RegistrationTransport},
	identity::AppIdentity,
	l10n::LocalizedMessage,
	obs::{self, OpKind, OpOutcome, OpSpan},
	platform::{
		ApiPath, ApiPaths, PaginationStyle, PlatformAdapter, PlatformCapabilities,
		PlatformDescriptor, PlatformId, TemplateVars, UrlTemplate,
	},
	platforms::{AppCredentials, AppSecret},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Stable identifier of the Mastodon platform, as used in routes and storage keys.
pub const PLATFORM_ID: &str = "mastodon";

const DISPLAY_NAME: &str = "Mastodon";
const REGISTRATION_FAILURE: &str =
	"Is {0} really a {1} server? It is currently not acting like one.";
const REGISTRATION_SCOPES: &str = "read";
const REGISTRATION_URL: &str = "https://{domain}/api/v1/apps";

/// Builds the Mastodon platform descriptor.
///
/// Descriptors are pure data; hosts typically build one at startup and share it read-only.
pub fn descriptor() -> Result<PlatformDescriptor> {
	let id = PlatformId::new(PLATFORM_ID).map_err(ConfigError::from)?;
	let paths = ApiPaths {
		user_info_by_id: api_path("/accounts/{user_id}")?,
		self_user_info: api_path("/accounts/verify_credentials")?,
		following_list: api_path("/accounts/{user_id}/following")?,
		// Instances gate the search API behind authentication, so name lookups stay
		// declared-absent instead of pointing at an endpoint that rejects app tokens.
		user_info_by_name: None,
	};

	PlatformDescriptor::builder(id)
		.display_name(DISPLAY_NAME)
		.example_account_address(LocalizedMessage::new("example@mastodon.social"))
		.account_url(url_template("https://{domain}/users/{user_name}")?)
		.authorization_endpoint(url_template("https://{domain}/oauth/authorize")?)
		.token_endpoint(url_template("https://{domain}/oauth/token")?)
		.api_base(url_template("https://{domain}/api/v1")?)
		.capabilities(PlatformCapabilities { federated: true, client_credentials: true })
		.paths(paths)
		.pagination(PaginationStyle::LinkHeader)
		.rate_limit_prefix("x-ratelimit-")
		.build()
		.map_err(ConfigError::from)
		.map_err(Error::from)
}

/// Field extraction rules for Mastodon account records.
pub const fn extractors() -> ExtractorSet {
	ExtractorSet {
		domain: FieldRule::key("url").clean(extract_domain_from_url),
		user_id: FieldRule::key("id"),
		user_name: FieldRule::key("username"),
		display_name: FieldRule::key("display_name"),
		avatar_url: FieldRule::key("avatar_static"),
		description: FieldRule::key("note"),
	}
}

/// Bundles the Mastodon descriptor, extractors, and record resolver for the host framework.
pub fn adapter() -> Result<PlatformAdapter> {
	Ok(PlatformAdapter::new(descriptor()?, extractors())
		.with_resolver(Arc::new(MastodonRecordResolver)))
}

/// Narrows Mastodon search responses to the first matching account.
///
/// Account searches wrap their candidates in an `accounts` list instead of answering with one
/// record. The first match wins; an empty or unusable list means the lookup found nobody.
/// Payloads without an `accounts` key are already account records and pass through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct MastodonRecordResolver;
impl RecordResolver for MastodonRecordResolver {
	fn resolve<'a>(&self, raw: &'a Json) -> Resolution<'a> {
		let Some(accounts) = raw.get("accounts") else {
			return Resolution::Default;
		};

		match accounts.as_array().and_then(|candidates| candidates.first()) {
			Some(first) => Resolution::Override(first),
			None => Resolution::NotFound,
		}
	}
}

/// Mastodon adapter handle that owns the per-instance registration call.
///
/// Construction mirrors the transports: [`Mastodon::new`] provisions the default reqwest
/// transport, [`Mastodon::with_transport`] accepts anything implementing
/// [`RegistrationTransport`].
#[derive(Clone)]
pub struct Mastodon<T>
where
	T: RegistrationTransport,
{
	/// Identity this application presents during instance registration.
	pub identity: AppIdentity,
	/// Transport used for the registration call.
	pub transport: Arc<T>,
}
impl<T> Mastodon<T>
where
	T: RegistrationTransport,
{
	/// Creates an adapter that reuses the caller-provided transport.
	pub fn with_transport(identity: AppIdentity, transport: impl Into<Arc<T>>) -> Self {
		Self { identity, transport: transport.into() }
	}

	/// Registers this application with the instance at `domain` and resolves with the client
	/// credentials the instance minted.
	///
	/// The domain is used as provided; validating its format is the caller's responsibility.
	/// The call makes exactly one attempt, bounded by the identity's API timeout, and never
	/// retries. A reply that is not a `200` carrying non-empty `client_id` and `client_secret`
	/// strings resolves to [`Error::BadGateway`] with a deferred, localizable message, after
	/// logging the diagnostics operators need. Network and timeout failures stay
	/// [`Error::Transport`] so hosts can tell a down instance from a misbehaving one.
	pub async fn register_app(&self, domain: &str) -> Result<AppCredentials> {
		const KIND: OpKind = OpKind::RegisterApp;

		let span = OpSpan::new(KIND, "register_app");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = registration_endpoint(domain)?;
				let form = self.registration_form(domain);
				let response = self
					.transport
					.post_form(&endpoint, &form, self.identity.request_timeout())
					.await?;

				interpret_registration(domain, &response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	fn registration_form(&self, domain: &str) -> [FormField; 4] {
		[
			("client_name", self.identity.app_name.clone()),
			("redirect_uris", self.identity.callback_for(domain)),
			("scopes", REGISTRATION_SCOPES.to_owned()),
			("website", self.identity.app_url.clone()),
		]
	}
}
#[cfg(feature = "reqwest")]
impl Mastodon<ReqwestTransport> {
	/// Creates an adapter backed by the crate's default reqwest transport.
	pub fn new(identity: AppIdentity) -> Self {
		Self::with_transport(identity, ReqwestTransport::default())
	}
}
impl<T> Debug for Mastodon<T>
where
	T: RegistrationTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Mastodon").field("identity", &self.identity).finish()
	}
}

/// Decoded registration reply. Missing keys and JSON nulls both decode to `None`.
#[derive(Debug, Default, Deserialize)]
struct RegistrationReply {
	client_id: Option<String>,
	client_secret: Option<String>,
}

fn registration_endpoint(domain: &str) -> Result<Url> {
	let template = url_template(REGISTRATION_URL)?;

	Ok(template.render(&TemplateVars::new().domain(domain)).map_err(ConfigError::from)?)
}

fn interpret_registration(domain: &str, response: &RawResponse) -> Result<AppCredentials> {
	let mut decode_detail = None;
	let reply = match decode_registration(&response.body) {
		Ok(reply) => reply,
		Err(source) => {
			decode_detail = Some(source.to_string());

			RegistrationReply::default()
		},
	};

	if response.status == 200
		&& let (Some(client_id), Some(client_secret)) = (
			reply.client_id.filter(|id| !id.is_empty()),
			reply.client_secret.filter(|secret| !secret.is_empty()),
		) {
		return Ok(AppCredentials { client_id, client_secret: AppSecret::new(client_secret) });
	}

	obs::log_upstream_failure(
		OpKind::RegisterApp,
		domain,
		Some(response.status),
		&response.body_text(),
		decode_detail.as_deref(),
	);

	Err(Error::BadGateway { message: registration_failure(domain) })
}

fn decode_registration(
	body: &[u8],
) -> Result<RegistrationReply, serde_path_to_error::Error<serde_json::Error>> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

fn registration_failure(domain: &str) -> LocalizedMessage {
	LocalizedMessage::new(REGISTRATION_FAILURE).arg(domain).arg(DISPLAY_NAME)
}

fn url_template(text: &'static str) -> Result<UrlTemplate> {
	Ok(UrlTemplate::new(text).map_err(ConfigError::from)?)
}

fn api_path(text: &'static str) -> Result<ApiPath> {
	Ok(ApiPath::new(text).map_err(ConfigError::from)?)
}

#[cfg(test)]
mod tests {
	// std
	use std::{sync::Mutex, time::Duration as StdDuration};
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{error::TransportError, http::TransportFuture};

	struct StubTransport {
		status: u16,
		body: &'static str,
		calls: Mutex<Vec<(String, Vec<(String, String)>, StdDuration)>>,
	}
	impl StubTransport {
		fn new(status: u16, body: &'static str) -> Self {
			Self { status, body, calls: Mutex::new(Vec::new()) }
		}
	}
	impl RegistrationTransport for StubTransport {
		fn post_form<'a>(
			&'a self,
			url: &'a Url,
			form: &'a [FormField],
			timeout: StdDuration,
		) -> TransportFuture<'a> {
			self.calls.lock().expect("Stub lock should not be poisoned.").push((
				url.to_string(),
				form.iter().map(|(key, value)| ((*key).to_owned(), value.clone())).collect(),
				timeout,
			));

			Box::pin(async move {
				Ok(RawResponse { status: self.status, body: self.body.as_bytes().to_vec() })
			})
		}
	}

	struct FailingTransport;
	impl RegistrationTransport for FailingTransport {
		fn post_form<'a>(
			&'a self,
			_url: &'a Url,
			_form: &'a [FormField],
			_timeout: StdDuration,
		) -> TransportFuture<'a> {
			Box::pin(async {
				Err(TransportError::network(std::io::Error::other("connection refused")))
			})
		}
	}

	fn identity() -> AppIdentity {
		AppIdentity::builder("Account Linker")
			.app_url("https://linker.example/")
			.callback_url("https://linker.example/on/mastodon/{domain}/associate")
			.build()
			.expect("Identity fixture should be valid.")
	}

	fn assert_bad_gateway(err: Error, domain: &str) {
		assert_eq!(err.http_status(), 502);

		match err {
			Error::BadGateway { message } => {
				let rendered = message.render();

				assert!(rendered.contains(domain), "{rendered} should name the domain.");
				assert!(rendered.contains("Mastodon"), "{rendered} should name the platform.");
			},
			other => panic!("Expected a bad gateway error, got {other:?}."),
		}
	}

	#[test]
	fn descriptor_declares_federated_metadata() {
		let descriptor = descriptor().expect("Descriptor should build.");

		assert_eq!(descriptor.id.as_ref(), PLATFORM_ID);
		assert_eq!(descriptor.display_name, "Mastodon");
		assert!(descriptor.capabilities.federated);
		assert!(descriptor.supports_client_credentials());
		assert_eq!(descriptor.pagination, PaginationStyle::LinkHeader);
		assert!(descriptor.paths.user_info_by_name.is_none());
		assert_eq!(
			descriptor
				.example_account_address
				.as_ref()
				.expect("Descriptor should carry an example address.")
				.render(),
			"example@mastodon.social",
		);
	}

	#[test]
	fn descriptor_renders_instance_urls() {
		let descriptor = descriptor().expect("Descriptor should build.");

		assert_eq!(
			descriptor
				.account_page_url("mastodon.social", "alice")
				.expect("Rendering should succeed.")
				.as_str(),
			"https://mastodon.social/users/alice",
		);
		assert_eq!(
			descriptor
				.user_info_url("mastodon.social", "13179")
				.expect("Rendering should succeed.")
				.as_str(),
			"https://mastodon.social/api/v1/accounts/13179",
		);
		assert_eq!(
			descriptor
				.self_user_info_url("mastodon.social")
				.expect("Rendering should succeed.")
				.as_str(),
			"https://mastodon.social/api/v1/accounts/verify_credentials",
		);
		assert_eq!(
			descriptor
				.following_list_url("mastodon.social", "13179")
				.expect("Rendering should succeed.")
				.as_str(),
			"https://mastodon.social/api/v1/accounts/13179/following",
		);
	}

	#[test]
	fn descriptor_matches_rate_limit_headers_case_insensitively() {
		let descriptor = descriptor().expect("Descriptor should build.");

		assert!(descriptor.is_rate_limit_header("x-ratelimit-remaining"));
		assert!(descriptor.is_rate_limit_header("X-RateLimit-Reset"));
		assert!(!descriptor.is_rate_limit_header("retry-after"));
	}

	#[test]
	fn extractors_map_account_records() {
		let record = json!({
			"id": "13179",
			"username": "alice",
			"display_name": "Alice",
			"avatar_static": "https://files.social/alice.png",
			"note": "hi",
			"url": "https://Mastodon.Social/@alice",
		});
		let profile =
			extractors().extract_profile(&record).expect("Extraction should succeed.");

		assert_eq!(profile.domain.as_deref(), Some("mastodon.social"));
		assert_eq!(profile.user_id, "13179");
		assert_eq!(profile.user_name.as_deref(), Some("alice"));
		assert_eq!(profile.display_name.as_deref(), Some("Alice"));
		assert_eq!(profile.avatar_url.as_deref(), Some("https://files.social/alice.png"));
		assert_eq!(profile.description.as_deref(), Some("hi"));
	}

	#[test]
	fn adapter_narrows_search_payloads() {
		let adapter = adapter().expect("Adapter should build.");
		let search = json!({
			"accounts": [
				{ "id": "1", "username": "first" },
				{ "id": "2", "username": "second" },
			],
		});
		let profile = adapter.user_profile(&search).expect("Extraction should succeed.");

		assert_eq!(profile.user_id, "1");
		assert_eq!(profile.user_name.as_deref(), Some("first"));
	}

	#[test]
	fn adapter_reports_empty_search_results_as_not_found() {
		let adapter = adapter().expect("Adapter should build.");

		for payload in [json!({ "accounts": [] }), json!({ "accounts": "nope" })] {
			let err = adapter
				.user_profile(&payload)
				.expect_err("Empty search results should not extract.");

			assert!(matches!(err, Error::NotFound));
			assert_eq!(err.http_status(), 404);
		}
	}

	#[test]
	fn adapter_extracts_plain_records_directly() {
		let adapter = adapter().expect("Adapter should build.");
		let profile = adapter
			.user_profile(&json!({ "id": 42, "username": "bob" }))
			.expect("Extraction should succeed.");

		assert_eq!(profile.user_id, "42");
	}

	#[tokio::test]
	async fn register_app_posts_the_registration_form() {
		let transport = Arc::new(StubTransport::new(
			200,
			"{\"client_id\":\"id-123\",\"client_secret\":\"secret-456\"}",
		));
		let mastodon = Mastodon::with_transport(identity(), transport.clone());
		let credentials = mastodon
			.register_app("social.example")
			.await
			.expect("Registration should succeed.");

		assert_eq!(credentials.client_id, "id-123");
		assert_eq!(credentials.client_secret.expose(), "secret-456");

		let calls = transport.calls.lock().expect("Stub lock should not be poisoned.");

		assert_eq!(calls.len(), 1, "Registration must make exactly one attempt.");

		let (url, form, timeout) = &calls[0];

		assert_eq!(url, "https://social.example/api/v1/apps");
		assert_eq!(*timeout, StdDuration::from_secs(20));
		assert_eq!(
			*form,
			vec![
				("client_name".to_owned(), "Account Linker".to_owned()),
				(
					"redirect_uris".to_owned(),
					"https://linker.example/on/mastodon/social.example/associate".to_owned(),
				),
				("scopes".to_owned(), "read".to_owned()),
				("website".to_owned(), "https://linker.example/".to_owned()),
			],
		);
	}

	#[tokio::test]
	async fn register_app_rejects_error_statuses() {
		let transport = StubTransport::new(
			500,
			"{\"client_id\":\"id-123\",\"client_secret\":\"secret-456\"}",
		);
		let mastodon = Mastodon::with_transport(identity(), transport);
		let err = mastodon
			.register_app("social.example")
			.await
			.expect_err("A 500 reply should not register.");

		assert_bad_gateway(err, "social.example");
	}

	#[tokio::test]
	async fn register_app_rejects_missing_or_blank_credentials() {
		for body in [
			"{\"client_id\":\"id-123\"}",
			"{\"client_id\":\"\",\"client_secret\":\"\"}",
			"{\"client_id\":null,\"client_secret\":\"secret-456\"}",
			"{}",
		] {
			let mastodon = Mastodon::with_transport(identity(), StubTransport::new(200, body));
			let err = mastodon
				.register_app("social.example")
				.await
				.expect_err("Partial credentials should not register.");

			assert_bad_gateway(err, "social.example");
		}
	}

	#[tokio::test]
	async fn register_app_rejects_malformed_bodies() {
		let mastodon = Mastodon::with_transport(
			identity(),
			StubTransport::new(200, "<html>upgrade in progress</html>"),
		);
		let err = mastodon
			.register_app("social.example")
			.await
			.expect_err("A non-JSON reply should not register.");

		assert_bad_gateway(err, "social.example");
	}

	#[tokio::test]
	async fn register_app_keeps_transport_failures_distinct() {
		let mastodon = Mastodon::with_transport(identity(), FailingTransport);
		let err = mastodon
			.register_app("social.example")
			.await
			.expect_err("A network failure should propagate.");

		assert!(matches!(err, Error::Transport(_)));
		assert_eq!(err.http_status(), 502);
	}
}
