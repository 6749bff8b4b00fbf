//! Adapter-level error types shared across platforms, extraction, and transports.

// self
use crate::{_prelude::*, extract::ProfileField, l10n::LocalizedMessage};

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Raw user record could not be mapped onto the canonical profile.
	#[error(transparent)]
	Extract(#[from] ExtractError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A search-style lookup matched no accounts.
	#[error("No matching account was found.")]
	NotFound,
	/// The contacted domain did not respond like a working instance of the platform.
	///
	/// The message stays unrendered until delivery so the host can translate it in the
	/// requester's language.
	#[error("{message}")]
	BadGateway {
		/// Deferred, localizable failure description.
		message: LocalizedMessage,
	},
}
impl Error {
	/// HTTP status the host framework should answer with for this error.
	pub fn http_status(&self) -> u16 {
		match self {
			Error::Config(_) => 500,
			Error::Extract(_) | Error::Transport(_) | Error::BadGateway { .. } => 502,
			Error::NotFound => 404,
		}
	}
}

/// Configuration and validation failures raised by the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Platform identifier failed validation.
	#[error(transparent)]
	Id(#[from] crate::platform::PlatformIdError),
	/// URL template could not be validated or rendered.
	#[error(transparent)]
	Template(#[from] crate::platform::TemplateError),
	/// Platform descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::platform::PlatformDescriptorError),
	/// Application identity failed validation.
	#[error(transparent)]
	Identity(#[from] crate::identity::IdentityError),
	/// Rendered endpoint was rejected by the OAuth2 client types.
	#[error("Rendered endpoint is not a valid OAuth2 URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
}

/// Failures mapping raw user records onto the canonical profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ExtractError {
	/// A mandatory canonical field is absent from the raw record.
	#[error("User record is missing the required `{field}` field.")]
	MissingField {
		/// Canonical field that could not be extracted.
		field: ProfileField,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the instance.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call exceeded the application's API timeout.
	#[error("Request timed out while calling the instance.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
