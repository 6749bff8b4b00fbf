//! Canonical profile fields and the rules that pull them out of raw user records.

// self
use crate::{_prelude::*, error::ExtractError};

/// Canonical profile fields every platform adapter maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
	/// Instance domain the account lives on.
	Domain,
	/// Stable platform-side account identifier.
	UserId,
	/// Login or handle name.
	UserName,
	/// Human-facing display name.
	DisplayName,
	/// Static avatar image URL.
	AvatarUrl,
	/// Free-form profile description.
	Description,
}
impl ProfileField {
	/// Returns a stable label suitable for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProfileField::Domain => "domain",
			ProfileField::UserId => "user_id",
			ProfileField::UserName => "user_name",
			ProfileField::DisplayName => "display_name",
			ProfileField::AvatarUrl => "avatar_url",
			ProfileField::Description => "description",
		}
	}
}
impl Display for ProfileField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Rule for pulling one canonical field out of a raw user record.
///
/// Rules read scalars only: strings pass through verbatim, numbers are stringified, and
/// anything else counts as absent. The empty string also counts as absent, because platforms
/// routinely blank optional profile fields instead of omitting them. An optional `clean` step
/// post-processes the raw text, e.g. deriving a bare domain from a profile URL.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
	/// JSON key the raw value is read from.
	pub key: &'static str,
	/// Optional post-processing applied to the raw text.
	pub clean: Option<fn(&str) -> Option<String>>,
}
impl FieldRule {
	/// Creates a rule that reads `key` verbatim.
	pub const fn key(key: &'static str) -> Self {
		Self { key, clean: None }
	}

	/// Attaches a post-processing step to the rule.
	pub const fn clean(mut self, clean: fn(&str) -> Option<String>) -> Self {
		self.clean = Some(clean);

		self
	}

	/// Applies the rule to one raw record.
	pub fn extract(&self, record: &Json) -> Option<String> {
		let raw = match record.get(self.key)? {
			Json::String(text) => text.clone(),
			Json::Number(number) => number.to_string(),
			_ => return None,
		};

		if raw.is_empty() {
			return None;
		}

		match self.clean {
			Some(clean) => clean(&raw),
			None => Some(raw),
		}
	}
}

/// Per-field extraction rules for one platform.
///
/// One rule per canonical field keeps the mapping total by construction: a platform adapter
/// cannot forget a field without failing to compile.
#[derive(Clone, Copy, Debug)]
pub struct ExtractorSet {
	/// Rule producing [`ProfileField::Domain`].
	pub domain: FieldRule,
	/// Rule producing [`ProfileField::UserId`].
	pub user_id: FieldRule,
	/// Rule producing [`ProfileField::UserName`].
	pub user_name: FieldRule,
	/// Rule producing [`ProfileField::DisplayName`].
	pub display_name: FieldRule,
	/// Rule producing [`ProfileField::AvatarUrl`].
	pub avatar_url: FieldRule,
	/// Rule producing [`ProfileField::Description`].
	pub description: FieldRule,
}
impl ExtractorSet {
	/// Returns the rule mapped to `field`.
	pub fn rule(&self, field: ProfileField) -> FieldRule {
		match field {
			ProfileField::Domain => self.domain,
			ProfileField::UserId => self.user_id,
			ProfileField::UserName => self.user_name,
			ProfileField::DisplayName => self.display_name,
			ProfileField::AvatarUrl => self.avatar_url,
			ProfileField::Description => self.description,
		}
	}

	/// Extracts one canonical field from a raw record.
	pub fn extract(&self, field: ProfileField, record: &Json) -> Option<String> {
		self.rule(field).extract(record)
	}

	/// Maps a raw record onto the canonical profile.
	///
	/// Only the user identifier is mandatory; the remaining fields stay `None` when the record
	/// omits, blanks, or mistypes them.
	pub fn extract_profile(&self, record: &Json) -> Result<UserProfile, ExtractError> {
		let user_id = self
			.extract(ProfileField::UserId, record)
			.ok_or(ExtractError::MissingField { field: ProfileField::UserId })?;

		Ok(UserProfile {
			domain: self.extract(ProfileField::Domain, record),
			user_id,
			user_name: self.extract(ProfileField::UserName, record),
			display_name: self.extract(ProfileField::DisplayName, record),
			avatar_url: self.extract(ProfileField::AvatarUrl, record),
			description: self.extract(ProfileField::Description, record),
		})
	}
}

/// Canonical user profile shared by every platform adapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Instance domain derived from the account's profile URL.
	pub domain: Option<String>,
	/// Stable platform-side account identifier.
	pub user_id: String,
	/// Login or handle name.
	pub user_name: Option<String>,
	/// Human-facing display name.
	pub display_name: Option<String>,
	/// Static avatar image URL.
	pub avatar_url: Option<String>,
	/// Free-form profile description.
	pub description: Option<String>,
}

/// Derives the bare host component from a full profile URL.
///
/// Hosts are lowercased; ports, paths, and credentials never leak into the domain.
pub fn extract_domain_from_url(url: &str) -> Option<String> {
	let parsed = Url::parse(url).ok()?;

	parsed.host_str().map(str::to_ascii_lowercase)
}
