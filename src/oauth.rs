//! Bridges platform descriptors into the typed endpoints consumed by `oauth2` clients.
//!
//! The adapter never runs a token exchange itself. It renders one instance's endpoint templates
//! into [`AuthUrl`]/[`TokenUrl`] values and hands them to the host's `oauth2`-based flow,
//! together with whatever credentials
//! [`register_app`](crate::platforms::mastodon::Mastodon::register_app) minted for that
//! instance.

pub use oauth2;

// crates.io
use oauth2::{AuthUrl, TokenUrl};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	platform::{PlatformDescriptor, TemplateVars},
};

/// Typed OAuth2 endpoint pair for one instance of a platform.
#[derive(Clone, Debug)]
pub struct OAuthEndpoints {
	/// Authorization endpoint for the Authorization Code flow.
	pub authorization: AuthUrl,
	/// Token endpoint for exchanges and refreshes.
	pub token: TokenUrl,
}

impl PlatformDescriptor {
	/// Renders the OAuth2 endpoints for one instance of the platform.
	pub fn oauth_endpoints(&self, domain: &str) -> Result<OAuthEndpoints> {
		let vars = TemplateVars::new().domain(domain);
		let authorization =
			self.endpoints.authorization.render(&vars).map_err(ConfigError::from)?;
		let token = self.endpoints.token.render(&vars).map_err(ConfigError::from)?;
		let authorization = AuthUrl::new(authorization.into())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let token =
			TokenUrl::new(token.into()).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(OAuthEndpoints { authorization, token })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::platform::{ApiPath, ApiPaths, PlatformCapabilities, PlatformId, UrlTemplate};

	fn descriptor() -> PlatformDescriptor {
		PlatformDescriptor::builder(PlatformId::new("acme").expect("Identifier should be valid."))
			.display_name("Acme")
			.account_url(template("https://{domain}/users/{user_name}"))
			.authorization_endpoint(template("https://{domain}/oauth/authorize"))
			.token_endpoint(template("https://{domain}/oauth/token"))
			.api_base(template("https://{domain}/api/v1"))
			.capabilities(PlatformCapabilities { federated: true, client_credentials: false })
			.paths(ApiPaths {
				user_info_by_id: ApiPath::new("/accounts/{user_id}")
					.expect("Path should be valid."),
				self_user_info: ApiPath::new("/accounts/verify_credentials")
					.expect("Path should be valid."),
				following_list: ApiPath::new("/accounts/{user_id}/following")
					.expect("Path should be valid."),
				user_info_by_name: None,
			})
			.build()
			.expect("Descriptor fixture should be valid.")
	}

	fn template(text: &'static str) -> UrlTemplate {
		UrlTemplate::new(text).expect("Template should be valid.")
	}

	#[test]
	fn oauth_endpoints_render_per_instance() {
		let endpoints =
			descriptor().oauth_endpoints("social.example").expect("Rendering should succeed.");

		assert_eq!(endpoints.authorization.as_str(), "https://social.example/oauth/authorize");
		assert_eq!(endpoints.token.as_str(), "https://social.example/oauth/token");
	}

	#[test]
	fn oauth_endpoints_require_a_domain() {
		assert!(descriptor().oauth_endpoints("").is_err());
	}
}
