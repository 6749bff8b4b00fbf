//! Federated platform adapters for OAuth2 account linking - instance-templated descriptors,
//! canonical profile extraction, and per-instance app registration.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod extract;
pub mod http;
pub mod identity;
pub mod l10n;
pub mod oauth;
pub mod obs;
pub mod platform;
pub mod platforms;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestTransport,
		identity::AppIdentity,
		platforms::mastodon::Mastodon,
	};

	/// Adapter type alias used by reqwest-backed integration tests.
	pub type ReqwestTestMastodon = Mastodon<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Application identity fixture shared by integration tests.
	pub fn test_identity() -> AppIdentity {
		AppIdentity::builder("Account Linker")
			.app_url("https://linker.example/")
			.callback_url("https://linker.example/on/mastodon/associate?domain={domain}")
			.build()
			.expect("Failed to build the test application identity.")
	}

	/// Constructs a [`Mastodon`] adapter backed by the insecure reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_mastodon(identity: AppIdentity) -> ReqwestTestMastodon {
		Mastodon::with_transport(identity, test_reqwest_transport())
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as Json;
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
