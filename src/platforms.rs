//! Concrete platform adapters built on the descriptor, extractor, and transport vocabulary.

pub mod mastodon;

// self
use crate::_prelude::*;

/// Client credentials minted by one instance during application registration.
///
/// The credentials belong to the caller's OAuth2 flow for that instance; the adapter never
/// persists them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
	/// OAuth2 client identifier.
	pub client_id: String,
	/// OAuth2 client secret.
	pub client_secret: AppSecret,
}
impl Debug for AppCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

/// Redacted client secret wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSecret(String);
impl AppSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AppSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AppSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AppSecret").field(&"<redacted>").finish()
	}
}
impl Display for AppSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let credentials = AppCredentials {
			client_id: "id-123".into(),
			client_secret: AppSecret::new("super-secret"),
		};

		assert_eq!(format!("{}", credentials.client_secret), "<redacted>");
		assert!(!format!("{credentials:?}").contains("super-secret"));
		assert_eq!(credentials.client_secret.expose(), "super-secret");
	}
}
