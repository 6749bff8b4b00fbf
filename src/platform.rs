//! Platform vocabulary: identifiers, URL templates, descriptors, and the adapter bundle the
//! host framework consumes.

pub mod descriptor;
pub mod template;

pub use descriptor::*;
pub use template::*;

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{
	_prelude::*,
	extract::{ExtractorSet, RecordResolver, Resolution, UserProfile},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

const PLATFORM_ID_MAX_LEN: usize = 64;

/// Error returned when platform identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum PlatformIdError {
	/// The identifier was empty.
	#[error("Platform identifier cannot be empty.")]
	Empty,
	/// The identifier contains a character outside `a-z`, `0-9`, and `-`.
	#[error("Platform identifier may only contain lowercase ASCII letters, digits, and `-`.")]
	InvalidCharacter,
	/// The identifier exceeded the allowed character count.
	#[error("Platform identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier for a platform adapter.
///
/// Identifiers end up in routes, log fields, and storage keys, so they are restricted to a
/// lowercase URL-safe alphabet.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlatformId(String);
impl PlatformId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, PlatformIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for PlatformId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for PlatformId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<PlatformId> for String {
	fn from(value: PlatformId) -> Self {
		value.0
	}
}
impl TryFrom<String> for PlatformId {
	type Error = PlatformIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for PlatformId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for PlatformId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Platform({})", self.0)
	}
}
impl Display for PlatformId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for PlatformId {
	type Err = PlatformIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), PlatformIdError> {
	if view.is_empty() {
		return Err(PlatformIdError::Empty);
	}
	if !view.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
		return Err(PlatformIdError::InvalidCharacter);
	}
	if view.len() > PLATFORM_ID_MAX_LEN {
		return Err(PlatformIdError::TooLong { max: PLATFORM_ID_MAX_LEN });
	}

	Ok(())
}

/// Everything the host framework needs to drive one platform: the descriptor it reads, the
/// extraction rules it applies, and the record-resolution strategy that runs first.
#[derive(Clone)]
pub struct PlatformAdapter {
	/// Pure-data descriptor consumed by the host's OAuth2 and API layers.
	pub descriptor: PlatformDescriptor,
	/// Canonical field extraction rules.
	pub extractors: ExtractorSet,
	/// Record-resolution strategy applied before field extraction.
	pub resolver: Arc<dyn RecordResolver>,
}
impl PlatformAdapter {
	/// Bundles a descriptor with its extraction rules and the default resolver.
	pub fn new(descriptor: PlatformDescriptor, extractors: ExtractorSet) -> Self {
		Self { descriptor, extractors, resolver: Arc::new(crate::extract::DefaultRecordResolver) }
	}

	/// Overrides the record-resolution strategy.
	pub fn with_resolver(mut self, resolver: Arc<dyn RecordResolver>) -> Self {
		self.resolver = resolver;

		self
	}

	/// Maps a raw user payload onto the canonical profile.
	///
	/// The resolver runs first so search-style payloads are narrowed to one account record; an
	/// empty match set surfaces as [`Error::NotFound`].
	pub fn user_profile(&self, raw: &Json) -> Result<UserProfile> {
		const KIND: OpKind = OpKind::ProfileExtract;

		let span = OpSpan::new(KIND, "user_profile");
		let _guard = span.entered();

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = match self.resolver.resolve(raw) {
			Resolution::Override(record) =>
				self.extractors.extract_profile(record).map_err(Error::from),
			Resolution::Default => self.extractors.extract_profile(raw).map_err(Error::from),
			Resolution::NotFound => Err(Error::NotFound),
		};

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}
impl Debug for PlatformAdapter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PlatformAdapter")
			.field("descriptor", &self.descriptor)
			.field("extractors", &self.extractors)
			.finish()
	}
}
