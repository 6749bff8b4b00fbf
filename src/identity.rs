//! Application identity shared by every platform adapter.
//!
//! The identity carries what an application says about itself when it registers with a
//! federated instance, plus the API timeout that bounds every outbound call the adapter makes
//! on its behalf.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, platform::template};

/// Errors raised while validating an application identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum IdentityError {
	/// Instances display the name on their authorization screens.
	#[error("Application name cannot be empty.")]
	MissingAppName,
	/// Registration submits the site URL as the application's `website`.
	#[error("Application site URL is required.")]
	MissingAppUrl,
	/// Registration submits the callback as the application's `redirect_uris`.
	#[error("OAuth2 callback URL is required.")]
	MissingCallbackUrl,
	/// A non-positive timeout would reject every request before it is sent.
	#[error("API timeout must be positive.")]
	NonPositiveTimeout,
	/// Callbacks may only vary by instance domain.
	#[error("Callback URL references the unknown placeholder `{placeholder}`.")]
	UnknownCallbackPlaceholder {
		/// Placeholder that failed validation.
		placeholder: String,
	},
}

/// Identity an application presents when talking to platform instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
	/// Application name sent as `client_name` during registration.
	pub app_name: String,
	/// Public site URL sent as `website` during registration.
	pub app_url: String,
	/// OAuth2 callback URL, optionally parameterized by `{domain}` so federated platforms can
	/// route the user back through the instance they authorized on.
	pub callback_url: String,
	/// Upper bound applied to every outbound API call.
	pub api_timeout: Duration,
}
impl AppIdentity {
	/// Default per-request timeout applied when the builder leaves it unset.
	pub const DEFAULT_API_TIMEOUT: Duration = Duration::seconds(20);

	/// Creates a builder seeded with the application name.
	pub fn builder(app_name: impl Into<String>) -> AppIdentityBuilder {
		AppIdentityBuilder::new(app_name.into())
	}

	/// Renders the callback URL for one federated domain.
	pub fn callback_for(&self, domain: &str) -> String {
		self.callback_url.replace("{domain}", domain)
	}

	/// Returns the API timeout converted for std-based transports.
	pub fn request_timeout(&self) -> StdDuration {
		self.api_timeout.unsigned_abs()
	}
}

/// Builder for [`AppIdentity`] values.
#[derive(Debug)]
pub struct AppIdentityBuilder {
	/// Application name sent as `client_name`.
	pub app_name: String,
	/// Public site URL sent as `website`.
	pub app_url: Option<String>,
	/// OAuth2 callback URL template.
	pub callback_url: Option<String>,
	/// Upper bound applied to every outbound API call.
	pub api_timeout: Duration,
}
impl AppIdentityBuilder {
	fn new(app_name: String) -> Self {
		Self {
			app_name,
			app_url: None,
			callback_url: None,
			api_timeout: AppIdentity::DEFAULT_API_TIMEOUT,
		}
	}

	/// Sets the public site URL.
	pub fn app_url(mut self, url: impl Into<String>) -> Self {
		self.app_url = Some(url.into());

		self
	}

	/// Sets the OAuth2 callback URL template.
	pub fn callback_url(mut self, url: impl Into<String>) -> Self {
		self.callback_url = Some(url.into());

		self
	}

	/// Overrides the API timeout.
	pub fn api_timeout(mut self, timeout: Duration) -> Self {
		self.api_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting identity.
	pub fn build(self) -> Result<AppIdentity, IdentityError> {
		if self.app_name.trim().is_empty() {
			return Err(IdentityError::MissingAppName);
		}

		let app_url = self
			.app_url
			.filter(|url| !url.trim().is_empty())
			.ok_or(IdentityError::MissingAppUrl)?;
		let callback_url = self
			.callback_url
			.filter(|url| !url.trim().is_empty())
			.ok_or(IdentityError::MissingCallbackUrl)?;

		if !self.api_timeout.is_positive() {
			return Err(IdentityError::NonPositiveTimeout);
		}
		if let Some(placeholder) =
			template::placeholders(&callback_url).find(|&placeholder| placeholder != "domain")
		{
			return Err(IdentityError::UnknownCallbackPlaceholder {
				placeholder: placeholder.to_owned(),
			});
		}

		Ok(AppIdentity {
			app_name: self.app_name,
			app_url,
			callback_url,
			api_timeout: self.api_timeout,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> AppIdentityBuilder {
		AppIdentity::builder("Account Linker")
			.app_url("https://linker.example/")
			.callback_url("https://linker.example/on/mastodon/{domain}/associate")
	}

	#[test]
	fn build_applies_the_default_timeout() {
		let identity = builder().build().expect("Identity should be valid.");

		assert_eq!(identity.api_timeout, AppIdentity::DEFAULT_API_TIMEOUT);
		assert_eq!(identity.request_timeout(), std::time::Duration::from_secs(20));
	}

	#[test]
	fn build_validates_required_fields() {
		assert_eq!(
			AppIdentity::builder(" ")
				.app_url("https://linker.example/")
				.callback_url("https://linker.example/cb")
				.build(),
			Err(IdentityError::MissingAppName),
		);
		assert_eq!(
			AppIdentity::builder("Account Linker")
				.callback_url("https://linker.example/cb")
				.build(),
			Err(IdentityError::MissingAppUrl),
		);
		assert_eq!(
			AppIdentity::builder("Account Linker").app_url("https://linker.example/").build(),
			Err(IdentityError::MissingCallbackUrl),
		);
	}

	#[test]
	fn build_rejects_non_positive_timeouts() {
		assert_eq!(
			builder().api_timeout(Duration::ZERO).build(),
			Err(IdentityError::NonPositiveTimeout),
		);
	}

	#[test]
	fn build_rejects_unknown_callback_placeholders() {
		assert_eq!(
			builder()
				.callback_url("https://linker.example/on/{platform}/associate")
				.build(),
			Err(IdentityError::UnknownCallbackPlaceholder { placeholder: "platform".into() }),
		);
	}

	#[test]
	fn callback_for_substitutes_the_domain() {
		let identity = builder().build().expect("Identity should be valid.");

		assert_eq!(
			identity.callback_for("social.example"),
			"https://linker.example/on/mastodon/social.example/associate",
		);
	}
}
