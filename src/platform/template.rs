//! `{domain}`-style substitution primitives for federated URL templates.
//!
//! Federated platforms have no fixed hostname; every absolute URL and API path is a template
//! rendered per instance. Templates validate their placeholder vocabulary at construction so a
//! typo like `{user}` fails at startup instead of the first lookup.

// self
use crate::_prelude::*;

const KNOWN_VARS: [&str; 3] = ["domain", "user_id", "user_name"];

/// Errors raised while validating or rendering templates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TemplateError {
	/// Template references a placeholder outside the adapter vocabulary.
	#[error("Template `{template}` references the unknown placeholder `{placeholder}`.")]
	UnknownPlaceholder {
		/// Offending template text.
		template: String,
		/// Placeholder that failed validation.
		placeholder: String,
	},
	/// Rendering lacked a value for a referenced placeholder.
	#[error("Template `{template}` requires a value for `{placeholder}`.")]
	MissingVar {
		/// Template text being rendered.
		template: String,
		/// Placeholder no value was supplied for.
		placeholder: String,
	},
	/// Absolute templates must pin the HTTPS scheme.
	#[error("Template `{template}` must start with `https://`.")]
	InsecureTemplate {
		/// Offending template text.
		template: String,
	},
	/// API paths must be anchored at the instance root.
	#[error("Path template `{template}` must start with `/`.")]
	RelativePath {
		/// Offending template text.
		template: String,
	},
	/// The rendered URL failed to parse.
	#[error("Rendered URL `{rendered}` is invalid.")]
	InvalidRendered {
		/// Rendered text that failed parsing.
		rendered: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Values substituted into templates during rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TemplateVars<'a> {
	domain: Option<&'a str>,
	user_id: Option<&'a str>,
	user_name: Option<&'a str>,
}
impl<'a> TemplateVars<'a> {
	/// Creates an empty variable set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the `{domain}` value.
	pub fn domain(mut self, value: &'a str) -> Self {
		self.domain = Some(value);

		self
	}

	/// Sets the `{user_id}` value.
	pub fn user_id(mut self, value: &'a str) -> Self {
		self.user_id = Some(value);

		self
	}

	/// Sets the `{user_name}` value.
	pub fn user_name(mut self, value: &'a str) -> Self {
		self.user_name = Some(value);

		self
	}

	fn get(&self, name: &str) -> Option<&'a str> {
		match name {
			"domain" => self.domain,
			"user_id" => self.user_id,
			"user_name" => self.user_name,
			_ => None,
		}
	}
}

/// Absolute HTTPS URL template parameterized by federated variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTemplate {
	template: Cow<'static, str>,
}
impl UrlTemplate {
	/// Validates and wraps an absolute HTTPS URL template.
	pub fn new(template: impl Into<Cow<'static, str>>) -> Result<Self, TemplateError> {
		let template = template.into();

		if !template.starts_with("https://") {
			return Err(TemplateError::InsecureTemplate { template: template.into_owned() });
		}

		validate_placeholders(&template)?;

		Ok(Self { template })
	}

	/// Returns the raw template text.
	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// True when the template references `{name}`.
	pub fn references(&self, name: &str) -> bool {
		placeholders(&self.template).any(|candidate| candidate == name)
	}

	/// Renders the template into a parsed [`Url`].
	pub fn render(&self, vars: &TemplateVars) -> Result<Url, TemplateError> {
		let rendered = fill(&self.template, vars)?;

		Url::parse(&rendered).map_err(|source| TemplateError::InvalidRendered { rendered, source })
	}
}
impl Display for UrlTemplate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Instance-relative API path template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPath {
	template: Cow<'static, str>,
}
impl ApiPath {
	/// Validates and wraps an instance-relative path template.
	pub fn new(template: impl Into<Cow<'static, str>>) -> Result<Self, TemplateError> {
		let template = template.into();

		if !template.starts_with('/') {
			return Err(TemplateError::RelativePath { template: template.into_owned() });
		}

		validate_placeholders(&template)?;

		Ok(Self { template })
	}

	/// Returns the raw template text.
	pub fn as_str(&self) -> &str {
		&self.template
	}

	/// Renders the path for one request.
	pub fn render(&self, vars: &TemplateVars) -> Result<String, TemplateError> {
		fill(&self.template, vars)
	}
}
impl Display for ApiPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

pub(crate) fn placeholders(template: &str) -> impl Iterator<Item = &str> {
	template
		.split('{')
		.skip(1)
		.filter_map(|segment| segment.split_once('}').map(|(name, _)| name))
}

fn validate_placeholders(template: &str) -> Result<(), TemplateError> {
	for placeholder in placeholders(template) {
		if !KNOWN_VARS.contains(&placeholder) {
			return Err(TemplateError::UnknownPlaceholder {
				template: template.to_owned(),
				placeholder: placeholder.to_owned(),
			});
		}
	}

	Ok(())
}

fn fill(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
	let mut rendered = template.to_owned();

	for name in KNOWN_VARS {
		let token = format!("{{{name}}}");

		if !rendered.contains(&token) {
			continue;
		}

		let Some(value) = vars.get(name) else {
			return Err(TemplateError::MissingVar {
				template: template.to_owned(),
				placeholder: name.to_owned(),
			});
		};

		rendered = rendered.replace(&token, value);
	}

	Ok(rendered)
}
