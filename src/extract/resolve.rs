//! Record-resolution strategies applied before field extraction.
//!
//! Some platforms answer user lookups with search-style containers (a list of candidate
//! accounts) instead of one record. Resolvers inspect the raw payload and decide which record
//! extraction reads, without being coupled to the extraction rules themselves.

// self
use crate::_prelude::*;

/// Strategy hook that narrows a raw payload to the account record fields are extracted from.
pub trait RecordResolver
where
	Self: Send + Sync,
{
	/// Inspects `raw` and decides how extraction proceeds.
	fn resolve<'a>(&self, raw: &'a Json) -> Resolution<'a>;
}

/// Decision produced by a [`RecordResolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
	/// Extract from this record instead of the raw payload.
	Override(&'a Json),
	/// A search-style payload matched no accounts.
	NotFound,
	/// Extract from the raw payload unchanged.
	Default,
}

/// Default strategy that always extracts from the raw payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRecordResolver;
impl RecordResolver for DefaultRecordResolver {
	fn resolve<'a>(&self, _raw: &'a Json) -> Resolution<'a> {
		Resolution::Default
	}
}
impl Display for DefaultRecordResolver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-record-resolver")
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn default_resolver_never_overrides() {
		let payload = json!({ "accounts": [{ "id": "1" }] });

		assert_eq!(DefaultRecordResolver.resolve(&payload), Resolution::Default);
	}
}
