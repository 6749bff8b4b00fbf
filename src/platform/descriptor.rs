//! Platform descriptor data structures and helpers shared with the host framework.
//!
//! The module exposes validated metadata and supporting builder utilities so platforms can
//! describe their instances, capabilities, and API conventions in a transport-agnostic way.
//! Descriptors are pure data: hosts build one per platform at startup and read it everywhere.

/// Builder API for assembling platform descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	l10n::LocalizedMessage,
	platform::{ApiPath, PlatformId, TemplateError, TemplateVars, UrlTemplate},
};

/// Pagination conventions a platform's list endpoints follow.
///
/// The descriptor only declares the convention; walking pages is the host paginator's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStyle {
	#[default]
	/// Responses are not paginated.
	None,
	/// Pages are chained through RFC 5988 `Link` response headers.
	LinkHeader,
}

/// Capability flags declared by a platform descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
	/// Every domain runs an independent instance that applications register with individually.
	pub federated: bool,
	/// The platform accepts the client-credentials grant for app-only API calls.
	pub client_credentials: bool,
}

/// Endpoint templates declared by a platform descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEndpoints {
	/// Authorization endpoint used by the host's Authorization Code flow.
	pub authorization: UrlTemplate,
	/// Token endpoint used by the host for exchanges and refreshes.
	pub token: UrlTemplate,
	/// Base URL every API path is resolved against.
	pub api_base: UrlTemplate,
}

/// Instance-relative API paths the host framework addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPaths {
	/// Fetches one user record by platform identifier.
	pub user_info_by_id: ApiPath,
	/// Fetches the record of the authenticated user.
	pub self_user_info: ApiPath,
	/// Lists the accounts a user follows.
	pub following_list: ApiPath,
	/// Looks a user up by name, on platforms that expose such an endpoint.
	pub user_info_by_name: Option<ApiPath>,
}

/// Immutable platform descriptor consumed by the host framework.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
	/// Descriptor identifier.
	pub id: PlatformId,
	/// Human-facing platform name used in UI copy and error messages.
	pub display_name: String,
	/// Localizable sample address shown when asking users to connect an account.
	pub example_account_address: Option<LocalizedMessage>,
	/// Public profile page template.
	pub account_url: UrlTemplate,
	/// Endpoint templates exposed by the platform.
	pub endpoints: PlatformEndpoints,
	/// Capability flags.
	pub capabilities: PlatformCapabilities,
	/// API paths resolved against `endpoints.api_base`.
	pub paths: ApiPaths,
	/// Pagination convention followed by list responses.
	pub pagination: PaginationStyle,
	/// Lowercase prefix of the rate-limit headers the platform emits.
	pub rate_limit_prefix: Cow<'static, str>,
}
impl PlatformDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: PlatformId) -> PlatformDescriptorBuilder {
		PlatformDescriptorBuilder::new(id)
	}

	/// Checks whether the platform accepts the client-credentials grant.
	pub fn supports_client_credentials(&self) -> bool {
		self.capabilities.client_credentials
	}

	/// Checks whether `header` is one of the platform's rate-limit headers.
	///
	/// Matching is case-insensitive because HTTP header names arrive in arbitrary case.
	pub fn is_rate_limit_header(&self, header: &str) -> bool {
		header
			.get(..self.rate_limit_prefix.len())
			.is_some_and(|prefix| prefix.eq_ignore_ascii_case(&self.rate_limit_prefix))
	}

	/// Renders the public profile page URL for one account.
	pub fn account_page_url(&self, domain: &str, user_name: &str) -> Result<Url> {
		let vars = TemplateVars::new().domain(domain).user_name(user_name);

		Ok(self.account_url.render(&vars).map_err(ConfigError::from)?)
	}

	/// Renders the user-record endpoint URL for one platform identifier.
	pub fn user_info_url(&self, domain: &str, user_id: &str) -> Result<Url> {
		self.api_url(
			TemplateVars::new().domain(domain).user_id(user_id),
			&self.paths.user_info_by_id,
		)
	}

	/// Renders the authenticated-user endpoint URL.
	pub fn self_user_info_url(&self, domain: &str) -> Result<Url> {
		self.api_url(TemplateVars::new().domain(domain), &self.paths.self_user_info)
	}

	/// Renders the following-list endpoint URL for one platform identifier.
	pub fn following_list_url(&self, domain: &str, user_id: &str) -> Result<Url> {
		self.api_url(
			TemplateVars::new().domain(domain).user_id(user_id),
			&self.paths.following_list,
		)
	}

	fn api_url(&self, vars: TemplateVars, path: &ApiPath) -> Result<Url> {
		let base = self.endpoints.api_base.render(&vars).map_err(ConfigError::from)?;
		let path = path.render(&vars).map_err(ConfigError::from)?;
		let rendered = format!("{}{path}", base.as_str().trim_end_matches('/'));

		match Url::parse(&rendered) {
			Ok(url) => Ok(url),
			Err(source) =>
				Err(ConfigError::from(TemplateError::InvalidRendered { rendered, source }).into()),
		}
	}
}
