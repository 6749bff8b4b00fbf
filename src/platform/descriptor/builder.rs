// self
use crate::{
	_prelude::*,
	l10n::LocalizedMessage,
	platform::{
		ApiPaths, PaginationStyle, PlatformCapabilities, PlatformDescriptor, PlatformEndpoints,
		PlatformId, UrlTemplate,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PlatformDescriptorError {
	/// Display name drives UI copy and error messages.
	#[error("Missing display name.")]
	MissingDisplayName,
	/// Account page template is mandatory.
	#[error("Missing account URL template.")]
	MissingAccountUrl,
	/// Authorization endpoint is required for the host's Authorization Code flow.
	#[error("Missing authorization endpoint template.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint template.")]
	MissingTokenEndpoint,
	/// API base is mandatory.
	#[error("Missing API base template.")]
	MissingApiBase,
	/// API path set is mandatory.
	#[error("Missing API path set.")]
	MissingApiPaths,
	/// Federated platforms must parameterize their endpoints per instance.
	#[error("The {endpoint} template of a federated platform must reference `{{domain}}`.")]
	MissingDomainParameter {
		/// Which endpoint failed validation.
		endpoint: &'static str,
	},
	/// Prefixes are matched case-insensitively against a lowercase pattern.
	#[error("Rate-limit prefix `{prefix}` must be lowercase.")]
	RateLimitPrefixNotLowercase {
		/// Prefix that failed validation.
		prefix: String,
	},
}

/// Builder for [`PlatformDescriptor`] values.
#[derive(Debug)]
pub struct PlatformDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: PlatformId,
	/// Human-facing platform name.
	pub display_name: Option<String>,
	/// Localizable sample account address.
	pub example_account_address: Option<LocalizedMessage>,
	/// Public profile page template.
	pub account_url: Option<UrlTemplate>,
	/// Authorization endpoint template.
	pub authorization_endpoint: Option<UrlTemplate>,
	/// Token endpoint template.
	pub token_endpoint: Option<UrlTemplate>,
	/// API base template every path is resolved against.
	pub api_base: Option<UrlTemplate>,
	/// Capability flags.
	pub capabilities: PlatformCapabilities,
	/// API path set.
	pub paths: Option<ApiPaths>,
	/// Pagination convention.
	pub pagination: PaginationStyle,
	/// Rate-limit header prefix.
	pub rate_limit_prefix: Cow<'static, str>,
}
impl PlatformDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: PlatformId) -> Self {
		Self {
			id,
			display_name: None,
			example_account_address: None,
			account_url: None,
			authorization_endpoint: None,
			token_endpoint: None,
			api_base: None,
			capabilities: PlatformCapabilities::default(),
			paths: None,
			pagination: PaginationStyle::default(),
			rate_limit_prefix: Cow::Borrowed("x-ratelimit-"),
		}
	}

	/// Sets the human-facing platform name.
	pub fn display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Sets the localizable sample account address.
	pub fn example_account_address(mut self, address: LocalizedMessage) -> Self {
		self.example_account_address = Some(address);

		self
	}

	/// Sets the public profile page template.
	pub fn account_url(mut self, template: UrlTemplate) -> Self {
		self.account_url = Some(template);

		self
	}

	/// Sets the authorization endpoint template.
	pub fn authorization_endpoint(mut self, template: UrlTemplate) -> Self {
		self.authorization_endpoint = Some(template);

		self
	}

	/// Sets the token endpoint template.
	pub fn token_endpoint(mut self, template: UrlTemplate) -> Self {
		self.token_endpoint = Some(template);

		self
	}

	/// Sets the API base template.
	pub fn api_base(mut self, template: UrlTemplate) -> Self {
		self.api_base = Some(template);

		self
	}

	/// Overrides the capability flags.
	pub fn capabilities(mut self, capabilities: PlatformCapabilities) -> Self {
		self.capabilities = capabilities;

		self
	}

	/// Sets the API path set.
	pub fn paths(mut self, paths: ApiPaths) -> Self {
		self.paths = Some(paths);

		self
	}

	/// Overrides the pagination convention.
	pub fn pagination(mut self, pagination: PaginationStyle) -> Self {
		self.pagination = pagination;

		self
	}

	/// Overrides the rate-limit header prefix.
	pub fn rate_limit_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
		self.rate_limit_prefix = prefix.into();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<PlatformDescriptor, PlatformDescriptorError> {
		let display_name = self
			.display_name
			.filter(|name| !name.trim().is_empty())
			.ok_or(PlatformDescriptorError::MissingDisplayName)?;
		let account_url = self.account_url.ok_or(PlatformDescriptorError::MissingAccountUrl)?;
		let authorization = self
			.authorization_endpoint
			.ok_or(PlatformDescriptorError::MissingAuthorizationEndpoint)?;
		let token = self.token_endpoint.ok_or(PlatformDescriptorError::MissingTokenEndpoint)?;
		let api_base = self.api_base.ok_or(PlatformDescriptorError::MissingApiBase)?;
		let paths = self.paths.ok_or(PlatformDescriptorError::MissingApiPaths)?;
		let endpoints = PlatformEndpoints { authorization, token, api_base };
		let descriptor = PlatformDescriptor {
			id: self.id,
			display_name,
			example_account_address: self.example_account_address,
			account_url,
			endpoints,
			capabilities: self.capabilities,
			paths,
			pagination: self.pagination,
			rate_limit_prefix: self.rate_limit_prefix,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl PlatformDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), PlatformDescriptorError> {
		if self.capabilities.federated {
			validate_domain_parameter("authorization", &self.endpoints.authorization)?;
			validate_domain_parameter("token", &self.endpoints.token)?;
			validate_domain_parameter("api_base", &self.endpoints.api_base)?;
		}
		if self.rate_limit_prefix.chars().any(|c| c.is_ascii_uppercase()) {
			return Err(PlatformDescriptorError::RateLimitPrefixNotLowercase {
				prefix: self.rate_limit_prefix.clone().into_owned(),
			});
		}

		Ok(())
	}
}

fn validate_domain_parameter(
	name: &'static str,
	template: &UrlTemplate,
) -> Result<(), PlatformDescriptorError> {
	if template.references("domain") {
		Ok(())
	} else {
		Err(PlatformDescriptorError::MissingDomainParameter { endpoint: name })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::platform::ApiPath;

	fn base_builder() -> PlatformDescriptorBuilder {
		PlatformDescriptor::builder(
			PlatformId::new("acme").expect("Identifier should be valid."),
		)
		.display_name("Acme")
		.account_url(template("https://{domain}/users/{user_name}"))
		.authorization_endpoint(template("https://{domain}/oauth/authorize"))
		.token_endpoint(template("https://{domain}/oauth/token"))
		.api_base(template("https://{domain}/api/v1"))
		.paths(paths())
	}

	fn template(text: &'static str) -> UrlTemplate {
		UrlTemplate::new(text).expect("Template should be valid.")
	}

	fn paths() -> ApiPaths {
		ApiPaths {
			user_info_by_id: ApiPath::new("/accounts/{user_id}").expect("Path should be valid."),
			self_user_info: ApiPath::new("/accounts/verify_credentials")
				.expect("Path should be valid."),
			following_list: ApiPath::new("/accounts/{user_id}/following")
				.expect("Path should be valid."),
			user_info_by_name: None,
		}
	}

	#[test]
	fn build_produces_a_validated_descriptor() {
		let descriptor = base_builder()
			.capabilities(PlatformCapabilities { federated: true, client_credentials: true })
			.pagination(PaginationStyle::LinkHeader)
			.build()
			.expect("Builder should produce a descriptor.");

		assert_eq!(descriptor.id.as_ref(), "acme");
		assert_eq!(descriptor.display_name, "Acme");
		assert!(descriptor.supports_client_credentials());
		assert_eq!(descriptor.pagination, PaginationStyle::LinkHeader);
		assert_eq!(descriptor.rate_limit_prefix, "x-ratelimit-");
	}

	#[test]
	fn build_requires_a_display_name() {
		let err = base_builder()
			.display_name("  ")
			.build()
			.expect_err("Builder should reject a blank display name.");

		assert_eq!(err, PlatformDescriptorError::MissingDisplayName);
	}

	#[test]
	fn federated_platforms_must_parameterize_endpoints() {
		let err = base_builder()
			.capabilities(PlatformCapabilities { federated: true, client_credentials: false })
			.token_endpoint(template("https://fixed.example/oauth/token"))
			.build()
			.expect_err("Builder should reject an unparameterized endpoint.");

		assert_eq!(err, PlatformDescriptorError::MissingDomainParameter { endpoint: "token" });
	}

	#[test]
	fn rate_limit_prefix_must_be_lowercase() {
		let err = base_builder()
			.rate_limit_prefix("X-RateLimit-")
			.build()
			.expect_err("Builder should reject an uppercase prefix.");

		assert_eq!(
			err,
			PlatformDescriptorError::RateLimitPrefixNotLowercase {
				prefix: "X-RateLimit-".into(),
			},
		);
	}
}
