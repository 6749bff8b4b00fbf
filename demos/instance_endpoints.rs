//! Prints the per-instance URLs and the canonical profile a host framework would consume,
//! without touching the network.

// std
use std::env;
// crates.io
use color_eyre::Result;
use serde_json::json;
// self
use account_elsewhere::platforms::mastodon;

fn main() -> Result<()> {
	color_eyre::install()?;

	let domain = env::args().nth(1).unwrap_or_else(|| "mastodon.social".to_owned());
	let adapter = mastodon::adapter()?;
	let descriptor = &adapter.descriptor;
	let endpoints = descriptor.oauth_endpoints(&domain)?;

	println!("Platform: {} ({}).", descriptor.display_name, descriptor.id);
	if let Some(example) = &descriptor.example_account_address {
		println!("Example account: {example}.");
	}
	println!("Authorize at {}.", endpoints.authorization.as_str());
	println!("Exchange tokens at {}.", endpoints.token.as_str());
	println!("User lookup: {}.", descriptor.user_info_url(&domain, "13179")?);
	println!("Profile page: {}.", descriptor.account_page_url(&domain, "alice")?);

	let profile = adapter.user_profile(&json!({
		"id": "13179",
		"username": "alice",
		"display_name": "Alice",
		"avatar_static": "https://files.social/alice.png",
		"note": "Keeps the instance garden watered.",
		"url": format!("https://{domain}/@alice"),
	}))?;

	println!("Canonical profile: {profile:?}.");

	Ok(())
}
