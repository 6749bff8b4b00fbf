//! Deferred localization for user-facing messages.
//!
//! Messages capture their template and arguments when raised and resolve to text only when
//! delivered, so the host can translate them in the requester's language at render time. The
//! default-language template doubles as the catalog key, which keeps the seam compatible with
//! gettext-style dictionaries.

// self
use crate::_prelude::*;

/// Lookup seam for host-supplied translation catalogs.
pub trait Translate
where
	Self: Send + Sync,
{
	/// Returns the translated template for the default-language `template`, if the catalog has
	/// one.
	fn lookup(&self, template: &str) -> Option<Cow<'_, str>>;
}

/// Passthrough translator that always renders the default language.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTranslation;
impl Translate for NoTranslation {
	fn lookup(&self, _template: &str) -> Option<Cow<'_, str>> {
		None
	}
}

/// Unrendered user-facing message: a default-language template plus captured positional
/// arguments.
///
/// Placeholders are positional (`{0}`, `{1}`, ...) so translations can reorder them. [`Display`]
/// renders the default language, which keeps logs and assertions readable without a translator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedMessage {
	/// Default-language template containing positional placeholders.
	pub template: Cow<'static, str>,
	/// Arguments substituted into the template at render time.
	pub args: Vec<String>,
}
impl LocalizedMessage {
	/// Creates a message from a default-language template.
	pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
		Self { template: template.into(), args: Vec::new() }
	}

	/// Captures the next positional argument.
	pub fn arg(mut self, value: impl Into<String>) -> Self {
		self.args.push(value.into());

		self
	}

	/// Renders the default-language text.
	pub fn render(&self) -> String {
		fill_positional(&self.template, &self.args)
	}

	/// Renders through the host translator, falling back to the default language when the
	/// catalog has no entry for the template.
	pub fn render_with(&self, translator: &dyn Translate) -> String {
		match translator.lookup(&self.template) {
			Some(template) => fill_positional(&template, &self.args),
			None => self.render(),
		}
	}
}
impl Display for LocalizedMessage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.render())
	}
}

fn fill_positional(template: &str, args: &[String]) -> String {
	let mut text = template.to_owned();

	for (index, arg) in args.iter().enumerate() {
		text = text.replace(&format!("{{{index}}}"), arg);
	}

	text
}
