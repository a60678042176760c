use std::fmt;

use super::parser;
use crate::{
	error::Error,
	state::{State, Value},
};

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum TemplatePart {
	Static(String),
	Placeholder(String),
}

/// A shell command with `{key}` placeholders, filled in from the final
/// [`State`] of a file. Literal braces are written as `{{` and `}}`.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct CommandTemplate {
	pub text: String,
	pub parts: Vec<TemplatePart>,
}

impl CommandTemplate {
	pub fn parse<T: Into<String>>(text: T) -> Result<Self, Error> {
		let text = text.into();
		let parts = parser::parse(&text).map_err(|e| Error::Template {
			template: text.clone(),
			reason: e.variant.message().into_owned(),
		})?;
		Ok(Self { text, parts })
	}

	/// Materializes the template into a literal shell command.
	/// String values are shell-quoted; numbers and booleans are inserted as-is.
	pub fn render(&self, state: &State) -> Result<String, Error> {
		let mut output = String::new();
		for part in &self.parts {
			match part {
				TemplatePart::Static(s) => output.push_str(s),
				TemplatePart::Placeholder(key) => {
					let value = state.get(key).ok_or_else(|| Error::Template {
						template: self.text.clone(),
						reason: format!("`{key}` is not defined for file `{}`", state.old),
					})?;
					match value {
						Value::Str(s) => {
							let quoted = shlex::try_quote(&s).map_err(|e| Error::Template {
								template: self.text.clone(),
								reason: e.to_string(),
							})?;
							output.push_str(&quoted);
						}
						other => output.push_str(&other.to_string()),
					}
				}
			}
		}
		Ok(output)
	}
}

impl fmt::Display for CommandTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
