//! Demonstrates registering an application with a Mastodon instance and feeding the minted
//! credentials into the host's per-instance OAuth2 endpoints.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use account_elsewhere::{
	http::ReqwestTransport,
	identity::AppIdentity,
	platforms::mastodon::{self, Mastodon},
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let register_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/apps");
			then.status(200).header("content-type", "application/json").body(
				"{\"client_id\":\"demo-client-id\",\"client_secret\":\"demo-client-secret\"}",
			);
		})
		.await;
	let domain = server.address().to_string();
	let identity = AppIdentity::builder("Account Linker")
		.app_url("https://linker.example/")
		.callback_url("https://linker.example/on/mastodon/associate?domain={domain}")
		.build()?;
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let mastodon = Mastodon::with_transport(identity, transport);
	let credentials = mastodon.register_app(&domain).await?;

	println!("Registered with {domain}: client_id {}.", credentials.client_id);
	println!("Client secret stays redacted in logs: {}.", credentials.client_secret);

	let endpoints = mastodon::descriptor()?.oauth_endpoints(&domain)?;

	println!("Authorize at {}.", endpoints.authorization.as_str());

	register_mock.assert_async().await;

	Ok(())
}
