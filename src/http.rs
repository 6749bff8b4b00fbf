//! Transport primitives for instance registration calls.
//!
//! The module exposes [`RegistrationTransport`] as the adapter's only dependency on an HTTP
//! stack. Implementations submit a single form-encoded POST bounded by the caller's timeout and
//! hand back the raw status and body; classifying the reply stays with the platform adapter, so
//! transports never interpret responses. One request means one attempt, retries are the host's
//! decision.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::TransportError};

/// Form field submitted during registration.
pub type FormField = (&'static str, String);
/// Boxed future produced by [`RegistrationTransport`] implementations.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of submitting registration forms.
///
/// Implementations must be `Send + Sync + 'static` so adapters can share them behind `Arc<T>`
/// without additional wrappers, and the returned futures must remain `Send` for the lifetime of
/// the in-flight request.
pub trait RegistrationTransport
where
	Self: 'static + Send + Sync,
{
	/// Submits `form` to `url` and resolves with the raw response.
	///
	/// Implementations must bound the whole call by `timeout` and surface an exceeded bound as
	/// [`TransportError::Timeout`].
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [FormField],
		timeout: StdDuration,
	) -> TransportFuture<'a>;
}

/// Raw reply captured from a registration attempt.
///
/// Additional fields may be added in future releases, so downstream code should construct
/// values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code returned by the instance.
	pub status: u16,
	/// Unparsed response body.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Renders the body for diagnostics, replacing invalid UTF-8 lossily.
	pub fn body_text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Thin wrapper around [`ReqwestClient`] implementing [`RegistrationTransport`].
///
/// The wrapper applies the caller's timeout per request and otherwise leaves client policy
/// (TLS, proxies, redirects) to the wrapped [`ReqwestClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RegistrationTransport for ReqwestTransport {
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a [FormField],
		timeout: StdDuration,
	) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.post(url.clone())
				.form(form)
				.timeout(timeout)
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn body_text_replaces_invalid_utf8() {
		let response = RawResponse { status: 200, body: vec![0x68, 0x69, 0xFF] };

		assert_eq!(response.body_text(), "hi\u{FFFD}");
	}

	#[test]
	fn body_text_passes_valid_utf8_through() {
		let response = RawResponse { status: 200, body: b"{\"client_id\":\"x\"}".to_vec() };

		assert_eq!(response.body_text(), "{\"client_id\":\"x\"}");
	}
}
