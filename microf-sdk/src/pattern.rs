//! Translation of `*` wildcard globs into a capturing matcher and a
//! formatting template for the destination name.

use regex::Regex;

use crate::{error::Error, state::Params};

/// Image extensions that are split off a name (or a pattern) before
/// wildcard processing and put back afterwards.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

const WILDCARD: char = '*';

/// Splits a trailing known image extension (including the dot) off `name`.
/// The extension is empty if `name` does not end in one.
pub fn split_image_extension(name: &str) -> (&str, &str) {
	if let Some(dot) = name.rfind('.') {
		let ext = &name[dot + 1..];
		if dot > 0 && IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)) {
			return (&name[..dot], &name[dot..]);
		}
	}
	(name, "")
}

#[derive(Debug, Clone)]
struct Translation {
	matcher: Regex,
	from_ext: String,
	formatter: String,
	to_segments: Vec<String>,
	to_ext: String,
	wildcards: usize,
}

/// Turns a pair of "from"/"to" globs into a rename rule.
///
/// Without a configured pair every name is passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct PatternTranslator {
	translation: Option<Translation>,
}

impl PatternTranslator {
	pub fn passthrough() -> Self {
		Self::default()
	}

	pub fn new(from: &str, to: &str) -> Result<Self, Error> {
		let wildcards = from.matches(WILDCARD).count();
		if wildcards != to.matches(WILDCARD).count() {
			return Err(Error::Config(
				"the patterns provided to `--from-pattern` and `--to-pattern` do not contain the same number of `*` wildcard characters"
					.into(),
			));
		}

		let (from_stem, from_ext) = split_image_extension(from);
		let (to_stem, to_ext) = split_image_extension(to);

		let body = star_pattern(from_stem, |n| format!("(?P<wildcard{n}>.*)"), regex::escape);
		let matcher = Regex::new(&format!("(?s)^{body}$")).map_err(|e| Error::Config(format!("invalid --from-pattern `{from}`: {e}")))?;
		let formatter = star_pattern(to_stem, |n| format!("{{wildcard{n}}}"), str::to_string);

		Ok(Self {
			translation: Some(Translation {
				matcher,
				from_ext: from_ext.to_string(),
				formatter,
				to_segments: to_stem.split(WILDCARD).map(str::to_string).collect(),
				to_ext: to_ext.to_string(),
				wildcards,
			}),
		})
	}

	/// Builds the translator only when both patterns are given.
	pub fn from_options(from: Option<&str>, to: Option<&str>) -> Result<Self, Error> {
		match (from, to) {
			(Some(from), Some(to)) => Self::new(from, to),
			(None, None) => Ok(Self::passthrough()),
			_ => Err(Error::Config(
				"if one of `--from-pattern` or `--to-pattern` is given, then the other must be given as well".into(),
			)),
		}
	}

	pub fn is_passthrough(&self) -> bool {
		self.translation.is_none()
	}

	/// The regular expression the "from" pattern was compiled to.
	pub fn matcher(&self) -> Option<&str> {
		self.translation.as_ref().map(|t| t.matcher.as_str())
	}

	/// The "to" pattern with each `*` turned into a `{wildcardN}` placeholder.
	pub fn formatter(&self) -> Option<&str> {
		self.translation.as_ref().map(|t| t.formatter.as_str())
	}

	/// Captures the wildcards of `filename`, if it matches the "from" pattern.
	pub fn capture(&self, filename: &str) -> Option<Vec<String>> {
		let translation = self.translation.as_ref()?;
		let (stem, ext) = split_image_extension(filename);
		if !translation.from_ext.is_empty() && !translation.from_ext.eq_ignore_ascii_case(ext) {
			return None;
		}
		let captures = translation.matcher.captures(stem)?;
		Some(
			(0..translation.wildcards)
				.map(|n| captures.name(&format!("wildcard{n}")).map_or("", |m| m.as_str()).to_string())
				.collect(),
		)
	}

	/// Fills the formatter with captured wildcards. The extension comes from
	/// the "to" pattern when it has one, else it is carried over from `ext`.
	pub fn format(&self, captures: &[String], ext: &str) -> Option<String> {
		let translation = self.translation.as_ref()?;
		let mut name = String::new();
		for (n, segment) in translation.to_segments.iter().enumerate() {
			if n > 0 {
				name.push_str(captures.get(n - 1).map_or("", String::as_str));
			}
			name.push_str(segment);
		}
		let ext = if translation.to_ext.is_empty() { ext } else { &translation.to_ext };
		name.push_str(ext);
		Some(name)
	}

	pub fn accept(&self, filename: &str) -> Result<(String, Params), Error> {
		if self.is_passthrough() {
			return Ok((filename.to_string(), Params::None));
		}
		let captures = self
			.capture(filename)
			.ok_or_else(|| Error::reject(format!("file name `{filename}` does not match pattern provided with `--from-pattern`")))?;
		let (_, ext) = split_image_extension(filename);
		let new = self.format(&captures, ext).unwrap_or_else(|| filename.to_string());
		Ok((new, Params::Wildcards(captures)))
	}
}

/// Rebuilds `glob` with every `*` replaced by `star(n)` and every literal
/// segment passed through `escape`.
fn star_pattern<S, E>(glob: &str, star: S, escape: E) -> String
where
	S: Fn(usize) -> String,
	E: Fn(&str) -> String,
{
	let mut out = String::new();
	for (n, part) in glob.split(WILDCARD).enumerate() {
		if n > 0 {
			out.push_str(&star(n - 1));
		}
		out.push_str(&escape(part));
	}
	out
}
